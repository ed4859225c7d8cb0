//! # billdoc
//!
//! Invoice and quote document core: line items, discount and tax
//! derivation, status lifecycle, persistence, PDF export and contact import.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Untyped input (`f64`, form text) is clamped through [`core::sanitize`].
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use billdoc::core::*;
//! use rust_decimal_macros::dec;
//!
//! let mut doc = DocumentBuilder::new(DocumentKind::Invoice, "INV-2024-001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .client(Client::new("Northwind Traders"))
//!     .add_item(LineItem::new("1", "Design work", dec!(2), dec!(50)))
//!     .discount_rate(dec!(10))
//!     .tax_rate(dec!(8))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(doc.totals().total, dec!(97.2));
//!
//! let mut store = MemoryStore::new();
//! lifecycle::send(&mut doc, &mut store, TransitionPolicy::Permissive).unwrap();
//! assert_eq!(doc.status(), DocumentStatus::Sent);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document types, totals, lifecycle, numbering, validation |
//! | `store` | JSON file document store |
//! | `pdf` | PDF export with selectable templates |
//! | `contacts` | Contact book and row import with per-row errors |
//! | `settings` | Load workbench settings from file and environment |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "store")]
pub mod store;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "contacts")]
pub mod contacts;

#[cfg(feature = "settings")]
pub mod settings;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;

//! # Repository Module
//!
//! Database repository implementations for Orca.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuoteService / submit saga                                            │
//! │       │                                                                 │
//! │       │  db.quotes().insert_header(&header)                            │
//! │       ▼                                                                 │
//! │  ClientRepository    ProductRepository        QuoteRepository          │
//! │  ├── insert          ├── insert / list        ├── insert_header        │
//! │  ├── get             ├── insert_group         ├── insert_items         │
//! │  └── list            └── list_groups          ├── delete               │
//! │                                               ├── get / items          │
//! │                                               ├── print counter        │
//! │                                               └── report               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod product;
pub mod quote;

//! Serial text protocol.
//!
//! ```text
//! ┌────────────┐   ┌──────────┐   ┌──────────┐   ┌──────────────┐
//! │ ByteSource │──▶│  Framer  │──▶│  Parser  │──▶│  Controller  │
//! │ (trait)    │   │ <  ...  >│   │ type,kv* │   │  (dispatch)  │
//! └────────────┘   └──────────┘   └──────────┘   └──────────────┘
//! ```
//!
//! No escaping exists for `<`, `>`, `=` or `,` inside values.

pub mod framer;
pub mod parser;
pub mod transport;

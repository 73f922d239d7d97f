//! Remote Object Store Contracts
//!
//! Defines the interface boundary between the indexing core and the
//! remote object store it mirrors. The core only ever enumerates the
//! store through [`ObjectLister`]; upload/download/delete execution is
//! owned by the host application and is deliberately absent here.

pub mod error;
pub mod lister;

pub use error::{Result, StoreError};
pub use lister::{ObjectDescriptor, ObjectLister, ObjectPage};

//! Entity module - SeaORM entity definitions for the database.

pub mod storage_entry;

pub use storage_entry::{
    Column as StorageEntryColumn, Entity as StorageEntry, Model as StorageEntryModel,
};

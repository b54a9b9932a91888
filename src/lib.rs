pub mod annotation;
pub mod combination;
pub mod combinatorics;
pub mod error;
pub mod filter;
pub mod history_import;
pub mod shards;
pub mod storage;
pub mod universe;
pub mod verify;
pub mod view;

//! Labeled clip tables for training.
//!
//! A label table is a CSV of 2 second clips annotated by a human reviewer:
//! `file,start_time,end_time,<positive class>` with a 0/1 label column. The
//! training stage reads these, balances the classes, and writes tables the
//! training backend consumes.

mod balance;
mod table;

pub use balance::balance_classes;
pub use table::{LabeledClip, read_label_table, write_label_table};

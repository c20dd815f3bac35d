pub use self::{bit_board::*, direction::*, row_table::*};

pub(crate) mod bit_board;
pub(crate) mod direction;
pub(crate) mod row_table;

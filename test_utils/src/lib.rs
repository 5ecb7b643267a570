pub mod fixtures;
pub mod frontend;
pub mod ir;

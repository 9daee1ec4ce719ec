pub mod bwt;
pub mod fm;
pub mod pac;
pub mod sa;

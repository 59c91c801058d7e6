pub mod cc;
pub mod count;

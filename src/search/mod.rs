pub mod gateway;
pub mod pager;
pub mod validate;

pub mod country;
pub mod cuisine;
pub mod page;
pub mod restaurant;

pub mod article;
pub mod category;
pub mod contract;
pub mod product;
pub mod risk;

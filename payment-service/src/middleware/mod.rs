pub mod amount_param;

pub use amount_param::AmountParam;

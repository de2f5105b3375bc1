pub mod suggest;
pub mod trends;

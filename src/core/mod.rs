pub mod corpus;
pub mod logging;

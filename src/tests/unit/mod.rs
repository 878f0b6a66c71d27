mod resolver_chain_tests;
mod service_tests;

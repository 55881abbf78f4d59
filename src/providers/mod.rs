pub mod alternative_me;
pub mod binance;
pub mod finmind;
pub mod mempool;

const USER_AGENT: &str = "coindash/0.2";

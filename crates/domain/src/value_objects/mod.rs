pub mod amount;

pub use amount::{Amount, ETHER_DECIMALS, format_units, parse_units, parse_units_str, to_decimal};

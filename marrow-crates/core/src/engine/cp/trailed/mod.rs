mod trailed_integer;
mod trailed_values;

pub use trailed_integer::TrailedInteger;
pub use trailed_values::TrailedValues;

mod load;
mod member;
mod roster;

pub use load::{Dataset, load_dataset, parse_dataset};
pub use member::{Bill, Member};
pub use roster::Roster;

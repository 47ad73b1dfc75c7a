pub mod admin;
pub mod players;
#[cfg(test)]
pub mod testing;

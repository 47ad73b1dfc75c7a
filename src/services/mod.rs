pub mod player_api;
pub mod sync;
#[cfg(test)]
pub mod testing;

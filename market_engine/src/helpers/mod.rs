pub mod access_tokens;
pub mod passwords;
pub mod price_list;

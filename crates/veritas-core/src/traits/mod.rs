mod reference;
mod verdict_engine;

pub use reference::{IMerchantDirectory, IPostalDirectory, MerchantRecord, PostalRecord};
pub use verdict_engine::IVerdictEngine;

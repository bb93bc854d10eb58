pub mod beep;
pub mod cowsay;
pub mod texts;

pub use beep::BeepGate;
pub use cowsay::cowsay;

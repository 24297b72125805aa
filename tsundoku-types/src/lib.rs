mod nyaa;
pub use nyaa::*;

mod response;
pub use response::*;

mod show;
pub use show::*;

mod webhook;
pub use webhook::*;

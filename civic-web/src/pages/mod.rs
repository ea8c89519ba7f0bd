mod error;
pub mod login;
mod page_view;
pub mod register;
pub mod verify_email;

pub use error::ErrorPage;
pub use login::LoginPage;
pub use page_view::PageView;
pub use register::RegisterPage;
pub use verify_email::VerifyEmailPage;

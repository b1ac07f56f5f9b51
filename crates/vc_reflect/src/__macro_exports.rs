//! Items used by the code generated by `#[derive(Reflect)]`.

pub use alloc::boxed::Box;
pub use alloc::format;
pub use alloc::string::String;
pub use alloc::vec;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::info::TypeInfo;

    pub use inventory;

    /// Static registration of a `#[reflect(auto_register)]` type.
    pub struct AutoRegistration(pub fn() -> &'static TypeInfo);

    inventory::collect!(AutoRegistration);
}

//! Witness marker types.

/// Marker trait for a currency's authorization witness.
///
/// A witness is a zero-sized type with a private field, so only the module
/// that defines it can construct one. It must not implement `Clone` or
/// `Copy`: each privileged call consumes one witness by value.
///
/// # Example
///
/// ```
/// use maple_token_regulated::Witness;
///
/// mod rgd {
///     pub struct Rgd {
///         _private: (),
///     }
///
///     impl maple_token_regulated::Witness for Rgd {
///         const NAME: &'static str = "RGD";
///     }
///
///     pub(crate) fn witness() -> Rgd {
///         Rgd { _private: () }
///     }
/// }
///
/// let w = rgd::witness();
/// assert_eq!(<rgd::Rgd as Witness>::NAME, "RGD");
/// drop(w);
/// ```
///
/// Code outside the defining module cannot forge one:
///
/// ```compile_fail
/// mod rgd {
///     pub struct Rgd {
///         _private: (),
///     }
/// }
///
/// let forged = rgd::Rgd { _private: () };
/// ```
pub trait Witness: Sized + 'static {
    /// Human-readable currency name (for logging).
    const NAME: &'static str;
}

//! Macros for the typed integer readers.

/// Generates fixed-width integer readers on `ByteCursor`, not much to see.
macro_rules! impl_int_readers {
    ( $( $fname:ident => $ity:ident :: $conv:ident ),* $(,)? ) => {
        impl ByteCursor<'_> {
            $(
                #[doc = concat!("Reads a `", stringify!($ity), "` using `", stringify!($conv), "`.")]
                pub fn $fname(&mut self) -> Result<$ity, CodecError> {
                    let arr = self.read_arr::<{ std::mem::size_of::<$ity>() }>()?;
                    Ok(<$ity>::$conv(arr))
                }
            )*
        }
    };
}

pub mod compression;
pub mod pipeline;
pub mod writer;

#[cfg_attr(docsrs, doc(cfg(feature = "io-glob")))]
#[cfg(feature = "io-glob")]
pub mod glob;

pub(crate) mod fingerprint;
pub(crate) mod pause;
pub(crate) mod resolver;
pub(crate) mod timeline;

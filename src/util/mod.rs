pub(crate) mod err;

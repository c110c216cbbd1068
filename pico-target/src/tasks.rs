pub(crate) mod i2c;

//! Process exit codes, following sysexits(3)

/// Command line usage error, including starting as root
pub const EC_USAGE: u8 = 64;

/// Internal software error
pub const EC_SOFTWARE: u8 = 70;

/// Operating system error, such as an unusable socket
pub const EC_OSERR: u8 = 71;

/// Temporary failure; the caller may retry later
pub const EC_TEMPFAIL: u8 = 75;

/// Configuration error
pub const EC_CONFIG: u8 = 78;

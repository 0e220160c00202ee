pub mod accounts {

    pub const DEFAULT_SCAN_QUOTA: i32 = 31;
}

pub mod session {

    pub const DEFAULT_TTL_SECONDS: i64 = 3600;
}

pub mod passwords {

    /// Salt length in bytes for new PBKDF2 hashes
    pub const SALT_LEN: usize = 8;
}

pub mod reports {

    /// Inclusive upper bound of the random component mixed into a hashid
    pub const HASHID_SALT_MAX: u32 = 1000;
}

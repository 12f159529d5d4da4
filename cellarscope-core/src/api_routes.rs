macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Versioned dashboard API paths, shared by the server and its tests.
pub mod v1 {
    pub const HEALTH: &str = v1_path!("/health");

    pub mod auth {
        pub const LOGIN: &str = v1_path!("/auth/login");
        pub const LOGOUT: &str = v1_path!("/auth/logout");
        pub const STATUS: &str = v1_path!("/auth/status");
    }

    pub mod scans {
        pub const COLLECTION: &str = v1_path!("/scans");
        pub const STATS: &str = v1_path!("/scans/stats");
        pub const REFRESH: &str = v1_path!("/scans/refresh");
        pub const HTML: &str = v1_path!("/scans/html");
    }

    pub mod catalog {
        pub const COLLECTION: &str = v1_path!("/catalog");
        pub const STATS: &str = v1_path!("/catalog/stats");
        pub const REFRESH: &str = v1_path!("/catalog/refresh");
    }
}

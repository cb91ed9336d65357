// Crate entry point. Re-export modules so tests and binaries can import them easily.
//
// Responsibilities
// - Only declare and expose modules. No business logic here.

pub mod shared {
    pub mod core {
        pub mod domain_filter;
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod record_store;
        pub mod user_context;
    }
}

pub mod modules {
    pub mod super_calendar {
        pub mod core {
            pub mod calendar_record;
            pub mod configurator;
            pub mod description_template;
            pub mod event_time;
        }
        pub mod use_cases {
            pub mod regenerate_calendar {
                pub mod handler;
                pub mod project;
            }
            pub mod list_calendar_events {
                pub mod projection;
                pub mod queries_port;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod calendar_records;
                pub mod calendar_records_in_memory;
                pub mod configurators;
                pub mod configurators_in_memory;
            }
        }
    }
}

pub mod shell;

mod common;

mod dispatch_tests;
mod report_tests;

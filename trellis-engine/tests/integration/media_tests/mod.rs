pub mod test_screen_capture_end_reverts;

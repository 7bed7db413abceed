pub mod test_candidate_forwarded_to_relay;

pub mod test_leave_announces_departure;
pub mod test_participant_leave_destroys_session;

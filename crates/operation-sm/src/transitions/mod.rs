//! State transition functions of the Operation State Machine, grouped by the duty whose outcome
//! they process.

mod confirmation;
mod control;
mod planning;
mod signing;

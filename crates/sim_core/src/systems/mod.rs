pub mod assignment_rejected;
pub mod dispatch;
pub mod movement;

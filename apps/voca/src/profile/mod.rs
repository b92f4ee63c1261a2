// Profile Collector: the draft profile, its validation rules, and the intake wizard.
// Nothing here talks to the network; submission goes through `recommender`.

pub mod draft;
pub mod handlers;
pub mod validation;
pub mod wizard;

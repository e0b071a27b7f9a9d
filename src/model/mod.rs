pub mod expectation;
pub mod group;
pub mod member;
pub mod project;
pub mod questionnaire;

pub use expectation::ExpectationLevel;
pub use group::Group;
pub use member::{Member, MemberWithData};
pub use project::{Contact, ProjectConfig};
pub use questionnaire::{validate_submission, Questionnaire, QuestionnaireSubmission, Skill, SkillLevel};

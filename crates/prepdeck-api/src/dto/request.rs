//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use prepdeck_entity::user::{UserRole, UserStatus};

/// Email registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterBody {
    /// Email address.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    /// Chosen password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Optional display name.
    pub display_name: Option<String>,
}

/// Phone registration start body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartRegistrationBody {
    /// Phone number.
    #[validate(length(min = 7, message = "A valid phone number is required"))]
    pub phone: String,
}

/// Phone registration completion body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteRegistrationBody {
    /// Phone number the code was sent to.
    #[validate(length(min = 7))]
    pub phone: String,
    /// The verification code.
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Optional password.
    pub password: Option<String>,
}

/// Login request body. Either `email`+`password` or `phone`+`otp_code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginBody {
    /// Email address, for password login.
    pub email: Option<String>,
    /// Password, for password login.
    pub password: Option<String>,
    /// Phone number, for code login.
    pub phone: Option<String>,
    /// One-time code, for code login.
    pub otp_code: Option<String>,
}

/// Email verification body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyEmailBody {
    /// Email address being verified.
    #[validate(email)]
    pub email: String,
    /// The verification code.
    #[validate(length(min = 1))]
    pub code: String,
}

/// Email OTP request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendEmailOtpBody {
    /// Recipient email address.
    #[validate(email)]
    pub email: String,
}

/// Phone OTP request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendPhoneOtpBody {
    /// Recipient phone number.
    #[validate(length(min = 7))]
    pub phone: String,
}

/// Google OAuth exchange body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GoogleOAuthBody {
    /// Authorization code from the OAuth redirect.
    #[validate(length(min = 1, message = "Authorization code is required"))]
    pub code: String,
}

/// Query for OTP usage stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpUsageQuery {
    /// Channel: `EMAIL` or `PHONE`.
    pub channel: String,
}

/// Profile update body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileBody {
    /// New display name.
    pub display_name: Option<String>,
}

/// Password change body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordBody {
    /// Current password; optional for passwordless accounts.
    pub current_password: Option<String>,
    /// New password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Email change request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailChangeBody {
    /// The new email address.
    #[validate(email)]
    pub new_email: String,
}

/// Phone change request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PhoneChangeBody {
    /// The new phone number.
    #[validate(length(min = 7))]
    pub new_phone: String,
}

/// Confirmation body carrying just a code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmCodeBody {
    /// The verification code.
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

/// Lesson progress initialization body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeProgressBody {
    /// Total content items in the lesson.
    pub total_content: i32,
    /// Total topics in the lesson.
    pub total_topics: i32,
}

/// Query for badge listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeQuery {
    /// Restrict to one lesson.
    pub lesson_id: Option<Uuid>,
}

/// Query for leaderboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    /// Number of rows to return.
    #[serde(default = "default_leaderboard_limit")]
    pub limit: i64,
}

fn default_leaderboard_limit() -> i64 {
    10
}

/// Referral code application body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyCodeBody {
    /// The referral code.
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

/// Published exam listing query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamListQuery {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Optional subject filter.
    pub subject: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

/// Admin user listing query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserQuery {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Optional role filter.
    pub role: Option<UserRole>,
}

/// Admin status change body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusBody {
    /// The new account status.
    pub status: UserStatus,
}

/// Admin role change body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoleBody {
    /// The new role.
    pub role: UserRole,
}

/// Exam paper creation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePaperBody {
    /// Paper title.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Subject area.
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    /// Time limit in minutes.
    pub duration_minutes: i32,
}

/// Paper publication toggle body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishBody {
    /// Whether the paper is visible to students.
    pub is_published: bool,
}

/// Question creation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddQuestionBody {
    /// Question text.
    #[validate(length(min = 1))]
    pub prompt: String,
    /// Answer options.
    pub options: Vec<String>,
    /// Zero-based index of the correct option.
    pub correct_option: i32,
    /// Marks awarded for a correct answer.
    pub marks: i32,
    /// Explanation shown after answering.
    pub explanation: Option<String>,
    /// Display order within the paper.
    pub position: i32,
}

/// Signup series query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupSeriesQuery {
    /// Trailing window in days.
    #[serde(default = "default_signup_days")]
    pub days: i32,
}

fn default_signup_days() -> i32 {
    30
}

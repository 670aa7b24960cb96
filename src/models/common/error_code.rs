/// API 响应中的业务错误码
///
/// 按模块分段：1xxx 通用，2xxx 认证与用户，3xxx 班级，4xxx 问答，5xxx 文件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证与用户
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2100,
    UserNameInvalid = 2101,
    UserEmailInvalid = 2102,
    UserPasswordInvalid = 2103,
    UserNameAlreadyExists = 2104,
    UserEmailAlreadyExists = 2105,
    UserUpdateFailed = 2106,
    UserRoleInvalid = 2107,
    UserSuspended = 2108,

    // 班级
    ClassNotFound = 3000,
    ClassCreationFailed = 3001,
    ClassNameInvalid = 3002,
    ClassCodeInvalid = 3003,
    ClassCodeExhausted = 3004,
    ClassAlreadyJoined = 3005,
    ClassJoinFailed = 3006,
    ClassPermissionDenied = 3007,
    ClassMemberNotFound = 3008,
    ClassDeleteFailed = 3009,
    ClassCreatorCannotLeave = 3010,
    ClassSettingsInvalid = 3011,

    // 问答
    QuestionNotFound = 4000,
    QuestionInvalid = 4001,
    QuestionPermissionDenied = 4002,
    AnswerNotFound = 4100,
    AnswerInvalid = 4101,
    AnswerPermissionDenied = 4102,

    // 文件
    FileUploadFailed = 5000,
    FileNotFound = 5001,
    FileTypeNotAllowed = 5002,
    FileSizeExceeded = 5003,
    MultifileUploadNotAllowed = 5004,
    UploadsDisabled = 5005,
    AttachmentInvalid = 5006,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::ClassAlreadyJoined as i32, 3005);
        assert_eq!(ErrorCode::AnswerNotFound as i32, 4100);
    }
}

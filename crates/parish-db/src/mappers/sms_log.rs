//! SMS log model -> entity mapper

use parish_core::{
    DomainError, PhoneNumber, SmsLogEntry, SmsLogId, SmsMessageType, SmsStatus, UserId,
};

use super::corrupt_column;
use crate::models::SmsLogModel;

impl TryFrom<SmsLogModel> for SmsLogEntry {
    type Error = DomainError;

    fn try_from(model: SmsLogModel) -> Result<Self, Self::Error> {
        let message_type = SmsMessageType::parse(&model.message_type)
            .ok_or_else(|| corrupt_column("sms_log.message_type", &model.message_type))?;
        let status = SmsStatus::parse(&model.status)
            .ok_or_else(|| corrupt_column("sms_log.status", &model.status))?;

        Ok(SmsLogEntry {
            id: SmsLogId::from_uuid(model.id),
            user_id: model.user_id.map(UserId::from_uuid),
            phone: PhoneNumber::from_normalized(model.phone),
            message_type,
            body: model.message_body,
            provider_id: model.provider_id,
            status,
            created_at: model.created_at,
        })
    }
}

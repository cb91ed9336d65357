// Model descriptors shared by the tests.

use crate::shared::core::primitives::{FieldDescriptor, FieldType, ModelDescriptor, USER_MODEL};

fn field(name: &str, field_type: FieldType) -> FieldDescriptor {
    FieldDescriptor {
        name: name.into(),
        field_type,
    }
}

/// `project.task` with a date deadline, a datetime window, planned hours and two references.
pub fn make_task_model() -> ModelDescriptor {
    ModelDescriptor {
        id: 30,
        model: "project.task".into(),
        name: "Task".into(),
        fields: vec![
            field("name", FieldType::Char),
            field("stage", FieldType::Char),
            field(
                "user_id",
                FieldType::Many2one {
                    comodel: USER_MODEL.into(),
                },
            ),
            field(
                "partner_id",
                FieldType::Many2one {
                    comodel: "res.partner".into(),
                },
            ),
            field("date_deadline", FieldType::Date),
            field("date_start", FieldType::Datetime),
            field("date_end", FieldType::Datetime),
            field("planned_hours", FieldType::Float),
        ],
    }
}

/// `calendar.event` with recurring occurrences.
pub fn make_meeting_model() -> ModelDescriptor {
    ModelDescriptor {
        id: 41,
        model: "calendar.event".into(),
        name: "Meeting".into(),
        fields: vec![
            field("name", FieldType::Char),
            field(
                "user_id",
                FieldType::Many2one {
                    comodel: USER_MODEL.into(),
                },
            ),
            field("start", FieldType::Datetime),
            field("stop", FieldType::Datetime),
        ],
    }
}

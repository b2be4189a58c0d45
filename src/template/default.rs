//! Built-in template seeded under the `default` identifier.

use super::types::{FieldType, Template, TemplateField, DEFAULT_TEMPLATE_ID};

const DEFAULT_NAME: &str = "Default Certificate Template";

const DEFAULT_BODY: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Certificate</title>
    <style>
        body { font-family: Georgia, serif; margin: 0; padding: 40px; color: #333; }
        .certificate { max-width: 800px; margin: 0 auto; padding: 60px; text-align: center; border: 3px solid #764ba2; }
        .title { font-size: 48px; color: #764ba2; text-transform: uppercase; letter-spacing: 2px; }
        .recipient { font-size: 36px; margin: 20px 0; text-decoration: underline; }
        .course { font-size: 24px; color: #764ba2; font-weight: bold; margin: 20px 0; }
        .date { font-size: 16px; color: #666; margin-top: 40px; }
        .certificate-id { font-size: 12px; color: #999; margin-top: 20px; }
    </style>
</head>
<body>
    <div class="certificate">
        <h1 class="title">Certificate</h1>
        <p>Certificate of Completion</p>
        <p>This certifies that</p>
        <div class="recipient">{{Name}}</div>
        <p>has successfully completed the course</p>
        <div class="course">{{Course}}</div>
        <div class="date">
            Completed on: {{CompletionDate}}<br>
            Issued on: {{CreatedAt}}
        </div>
        <div class="certificate-id">Certificate ID: {{ID}}</div>
    </div>
</body>
</html>"#;

/// Build the default template, stamped with the given timestamp
pub fn default_template(timestamp: &str) -> Template {
    Template {
        id: DEFAULT_TEMPLATE_ID.to_string(),
        name: DEFAULT_NAME.to_string(),
        body: DEFAULT_BODY.to_string(),
        fields: vec![
            TemplateField::new("name", FieldType::String, true, "Recipient name"),
            TemplateField::new("course", FieldType::String, true, "Course name"),
            TemplateField::new(
                "completion_date",
                FieldType::Date,
                true,
                "Completion date (YYYY-MM-DD)",
            ),
        ],
        created_at: timestamp.to_string(),
        updated_at: timestamp.to_string(),
    }
}

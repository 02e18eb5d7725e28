//! Demo data for `--seed`: a handful of task specs, templates wired to
//! them, and shared lessons. Runs only against an empty database.

use promptdeck_core::ServiceError;
use records::model::{
    CreateLesson, CreateTaskSpec, CreateTemplate, Family, LessonListQuery, TaskSpecListQuery,
    TemplatePatch,
};
use records::store::RecordStore;
use serde_json::json;
use tracing::info;

const DEMO_USER_ID: &str = "user_demo";

pub fn seed_demo(store: &RecordStore) -> Result<(), ServiceError> {
    let has_specs = !store.list_task_specs(&TaskSpecListQuery::default())?.is_empty();
    let has_lessons = !store.list_lessons(&LessonListQuery::default())?.is_empty();
    if has_specs || has_lessons {
        info!("Database already contains records, skipping seed");
        return Ok(());
    }

    let blog_spec = store.insert_task_spec(
        DEMO_USER_ID,
        CreateTaskSpec {
            family: Family::Write,
            goal: "Create engaging blog posts about technology trends for corporate website"
                .to_string(),
            context: Some("B2B technology company focusing on cloud computing solutions".to_string()),
            inputs: json!({
                "topic": "cloud computing benefits",
                "keywords": ["scalability", "cost-efficiency", "security"],
                "wordCount": 800,
            }),
            constraints: json!({"tone": "professional", "maxLength": 1000, "includeCaseStudies": true}),
            audience: Some("business".to_string()),
            format: Some("markdown".to_string()),
            acceptance_criteria: json!({"readabilityScore": 70, "seoScore": 80, "originality": "high"}),
            privacy: json!(null),
            user_prefs: json!({"preferredLanguage": "en-US", "citationStyle": "APA"}),
            org_id: None,
        },
    )?;

    let code_spec = store.insert_task_spec(
        DEMO_USER_ID,
        CreateTaskSpec {
            family: Family::Code,
            goal: "Generate Python functions for data analysis and visualization".to_string(),
            context: Some("Financial services company building predictive models".to_string()),
            inputs: json!({
                "dataset": "customer_transactions",
                "analysisType": "time_series",
                "charts": ["line", "heatmap"],
            }),
            constraints: json!({"language": "python", "libraries": ["pandas", "matplotlib"], "pep8": true}),
            audience: Some("technical".to_string()),
            format: Some("json".to_string()),
            acceptance_criteria: json!({"performance": "O(n log n)", "testCoverage": 90, "documentation": "complete"}),
            privacy: json!(null),
            user_prefs: json!(null),
            org_id: None,
        },
    )?;

    let analyze_spec = store.insert_task_spec(
        DEMO_USER_ID,
        CreateTaskSpec {
            family: Family::Analyze,
            goal: "Analyze customer feedback sentiment and satisfaction trends".to_string(),
            context: Some(
                "E-commerce platform receiving thousands of product reviews daily".to_string(),
            ),
            inputs: json!({
                "dataSource": "product_reviews",
                "period": "last_6_months",
                "categories": ["shipping", "quality", "support"],
            }),
            constraints: json!({"accuracy": 95, "handleSarcasm": true, "multiLanguage": true}),
            audience: Some("business".to_string()),
            format: Some("html".to_string()),
            acceptance_criteria: json!({"sentimentAccuracy": 94, "trendDetection": "reliable"}),
            privacy: json!({"dataLevel": "confidential", "retention": "30_days"}),
            user_prefs: json!({"notifications": "weekly", "reportFormat": "executive_summary"}),
            org_id: None,
        },
    )?;

    let seed_templates = [
        (
            "Blog Post Template",
            "Template for engaging blog posts with SEO best practices, compelling headers, and call-to-action sections.",
            blog_spec.id,
            vec!["content", "marketing", "seo"],
            true,
        ),
        (
            "API Documentation Template",
            "Comprehensive template for documenting REST APIs with interactive examples and authentication details.",
            code_spec.id,
            vec!["technical", "documentation", "api"],
            true,
        ),
        (
            "Data Analysis Report",
            "Template for presenting analytical findings with visualizations, key metrics, and actionable insights.",
            analyze_spec.id,
            vec!["analytics", "reporting", "business"],
            false,
        ),
    ];

    for (title, description, spec_id, tags, proven) in seed_templates {
        let template = store.insert_template(
            DEMO_USER_ID,
            CreateTemplate {
                title: title.to_string(),
                description: Some(description.to_string()),
                task_spec_id: Some(spec_id),
                tags: tags.into_iter().map(String::from).collect(),
                org_id: None,
            },
        )?;
        if proven {
            store.update_template(
                template.id,
                template.org_id,
                DEMO_USER_ID,
                &TemplatePatch {
                    proven: Some(true),
                    ..Default::default()
                },
            )?;
        }
    }

    let seed_lessons = [
        (
            "Prompt Engineering Best Practices",
            vec![
                "Including 3-4 few-shot examples increased prompt accuracy from 67% to 89%",
                "Using role-based personification improved output quality significantly",
                "Adding explicit constraints in prompt headers reduced hallucinations by 45%",
                "Breaking complex tasks into multi-step prompts yielded better structured outputs",
            ],
            vec![
                "Create prompt templates with variable placeholders for reusable components",
                "Implement prompt chaining with intermediate validation checkpoints",
                "Build prompt A/B testing framework to measure effectiveness",
            ],
        ),
        (
            "Model Performance Optimization",
            vec![
                "Inference latency reduced from 850ms to 120ms by quantizing model weights to INT8",
                "Memory usage dropped 60% using gradient checkpointing during training",
                "Model ensembling provided marginal gains but doubled prediction costs",
            ],
            vec![
                "Implement mixed precision training to reduce memory usage",
                "Evaluate knowledge distillation for deploying smaller student models",
            ],
        ),
        (
            "Data Quality and Preprocessing",
            vec![
                "30% of training data contained mislabeled samples, found via outlier analysis",
                "Automated data validation caught 95% of input data issues",
                "Feature engineering outperformed architecture changes (15% vs 8% gain)",
            ],
            vec![
                "Build automated data profiling reports before preprocessing",
                "Use cross-validation for feature selection instead of a single validation set",
            ],
        ),
    ];

    for (title, bullets, next_time_try) in seed_lessons {
        store.insert_lesson(CreateLesson {
            title: title.to_string(),
            bullets: bullets.into_iter().map(String::from).collect(),
            next_time_try: next_time_try.into_iter().map(String::from).collect(),
        })?;
    }

    info!("Seeded demo data: 3 task specs, 3 templates, 3 lessons");
    Ok(())
}

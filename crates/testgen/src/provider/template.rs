use super::LlmProvider;
use crate::error::Result;
use crate::prompt::GenerationRequest;
use async_trait::async_trait;
use liteworkspace_core::config::JunitFlavor;

const JUNIT5_TEMPLATE: &str = r#"package ${PACKAGE};

import org.junit.jupiter.api.Test;

import static org.junit.jupiter.api.Assertions.assertNotNull;

class ${TEST_CLASS} {

    @Test
    void ${METHOD}() {
        // Arrange, act and assert against ${CLASS}.
        assertNotNull(${CLASS}.class);
    }
}
"#;

const JUNIT4_TEMPLATE: &str = r#"package ${PACKAGE};

import org.junit.Test;

import static org.junit.Assert.assertNotNull;

public class ${TEST_CLASS} {

    @Test
    public void ${METHOD}() {
        // Arrange, act and assert against ${CLASS}.
        assertNotNull(${CLASS}.class);
    }
}
"#;

/// Offline skeleton filled from the built-in JUnit template.
pub struct TemplateProvider {
    junit: JunitFlavor,
}

impl TemplateProvider {
    pub fn new(junit: JunitFlavor) -> Self {
        Self { junit }
    }

    pub fn fill(&self, request: &GenerationRequest) -> String {
        let target = &request.target_unit;
        let template = match self.junit {
            JunitFlavor::Junit4 => JUNIT4_TEMPLATE,
            JunitFlavor::Junit5 => JUNIT5_TEMPLATE,
        };
        let method = match &target.method_name {
            Some(name) => format!("test{}", capitalize(name)),
            None => "testCreation".to_string(),
        };
        let text = match &target.package {
            Some(package) => template.replace("${PACKAGE}", package),
            None => template.replacen("package ${PACKAGE};\n\n", "", 1),
        };
        text.replace("${TEST_CLASS}", &target.test_class_name())
            .replace("${CLASS}", &target.class_name)
            .replace("${METHOD}", &method)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl LlmProvider for TemplateProvider {
    fn name(&self) -> &str {
        "template"
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        Ok(format!("```java\n{}```\n", self.fill(request)))
    }
}

//! Figma conversion prompts.

use serde_json::{Value, json};

use super::PromptBuilder;

pub const MAX_TOKENS: u32 = 8192;

pub fn semantic_analysis(component_tree_json: &str) -> String {
    PromptBuilder::new()
        .role(
            "You are an expert UI/UX engineer specializing in converting design systems to Angular \
             components.",
        )
        .text("Analyze the following component tree extracted from a Figma design:")
        .code("json", component_tree_json)
        .numbered_section(
            "Provide a semantic analysis of this design system that includes:\n",
            [
                "Component Identification: Identify which elements should be Angular components",
                "Component Hierarchy: Determine parent-child relationships",
                "UI Element Classification: Classify elements as:\n   \
                 - Layout components (container, grid, flex)\n   \
                 - Navigation elements (menu, tabs, breadcrumbs)\n   \
                 - Form controls (inputs, buttons, selectors)\n   \
                 - Content displays (cards, lists, tables)\n   \
                 - Feedback elements (alerts, modals, notifications)",
                "Style System: Identify repeated styles that should be variables",
                "Interaction Patterns: Identify clickable elements and probable behavior",
                "Data Binding Opportunities: Where dynamic data would likely be bound",
                "Reusable Components: Which elements appear multiple times and should be componentized",
            ],
        )
        .text(
            "Format your response as JSON with these categories as keys, providing detailed analysis under \
             each.\nReturn JSON data only with no preamble or explanation.",
        )
        .build()
}

/// Angular conventions handed to the code generation prompt.
pub fn angular_patterns() -> Value {
    json!({
        "componentNaming": {
            "pattern": "${name}.component.ts",
            "examples": ["header.component.ts", "user-profile.component.ts"]
        },
        "folderStructure": {
            "pattern": "src/app/${feature}/${component}",
            "examples": ["src/app/shared/button", "src/app/user/profile"]
        },
        "styleSystems": {
            "options": ["SCSS", "CSS Variables", "Angular Material Theming"],
            "recommendation": "Use Angular Material's theme system for standard components and SCSS variables for custom elements"
        },
        "dataBindingSyntax": {
            "property": "[property]=\"value\"",
            "event": "(event)=\"handler($event)\"",
            "twoWay": "[(ngModel)]=\"value\""
        },
        "structuralDirectives": {
            "conditional": "*ngIf=\"condition\"",
            "loop": "*ngFor=\"let item of items\"",
            "switch": "[ngSwitch]=\"value\""
        },
        "componentCommunication": {
            "parentToChild": "@Input() propertyName: type;",
            "childToParent": "@Output() eventName = new EventEmitter<type>();",
            "service": "Use a shared service with observables"
        },
        "formPatterns": {
            "reactive": "FormGroup with FormControl instances",
            "template": "ngModel with #reference variables"
        },
        "stateManagement": {
            "local": "Component properties",
            "shared": "Services with BehaviorSubject/Observable",
            "global": "NgRx store"
        }
    })
}

const CODE_REQUIREMENTS: &str = r#"1. File Structure:
   - Generate complete file structure with all necessary files
   - Include module, component, and style files
   - Use proper naming conventions and file organization

2. Component Implementation:
   - Create well-structured TypeScript component classes
   - Implement component lifecycle hooks appropriately
   - Add proper Angular decorators (@Component, @Input, @Output, etc.)
   - Include comments for complex logic

3. Templates:
   - Create semantic HTML templates for each component
   - Use structural directives (ngIf, ngFor) where appropriate
   - Implement proper data binding
   - Use Angular Material components where appropriate

4. Styling:
   - Create SCSS files with variables for reusable styles
   - Implement responsive design principles
   - Use Angular Material theming system for consistency

5. Module Setup:
   - Create feature modules and shared modules
   - Add proper imports and exports
   - Set up component declarations

6. Parent-Child Communication:
   - Implement @Input and @Output where needed
   - Add EventEmitter for child-to-parent communication

7. Data Structure:
   - Create TypeScript interfaces for data models
   - Use proper typing throughout components

8. Services (if needed):
   - Include service implementations for data handling
   - Use dependency injection properly"#;

pub fn code_generation(semantic_analysis_json: &str, angular_patterns_json: &str) -> String {
    PromptBuilder::new()
        .role(
            "You're a senior Angular developer tasked with creating production-ready Angular components \
             from a Figma design.",
        )
        .text("Use this semantic analysis of the design:")
        .code("json", semantic_analysis_json)
        .text("Follow these Angular best practices and patterns:")
        .code("json", angular_patterns_json)
        .section(
            "Create complete Angular components that implement this design with the following \
             requirements:\n",
            CODE_REQUIREMENTS,
        )
        .text(
            "Return a JSON object where each key is a file path (relative to project root) and the value is \
             the file content.\n\
             Include all necessary files to make the components work together properly.\n\
             Ensure that the generated code follows Angular best practices and modern TypeScript standards.",
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_analysis_prompt() {
        let prompt = semantic_analysis("{\"name\": \"Page\"}");
        assert!(prompt.contains("```json\n{\"name\": \"Page\"}\n```"));
        assert!(prompt.contains("7. Reusable Components:"));
        assert!(prompt.ends_with("Return JSON data only with no preamble or explanation."));
    }

    #[test]
    fn test_patterns_cover_binding_syntax() {
        let patterns = angular_patterns();
        assert_eq!(
            patterns["structuralDirectives"]["loop"],
            "*ngFor=\"let item of items\""
        );
        assert_eq!(patterns.as_object().map(|o| o.len()), Some(8));
    }

    #[test]
    fn test_code_generation_embeds_both_inputs() {
        let prompt = code_generation("{\"a\": 1}", "{\"b\": 2}");
        assert!(prompt.contains("```json\n{\"a\": 1}\n```"));
        assert!(prompt.contains("```json\n{\"b\": 2}\n```"));
        assert!(prompt.contains("8. Services (if needed):"));
        assert!(prompt.contains("each key is a file path"));
    }
}

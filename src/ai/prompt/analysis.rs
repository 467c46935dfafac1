//! Batch analysis prompts.
//!
//! Templates for the nine analysis steps. Per-file prompts receive source
//! text the caller has already truncated; cross-file prompts receive JSON the
//! pipeline assembled from earlier stage results.

use serde_json::Value;

use super::PromptBuilder;
use crate::types::{UNKNOWN, json_array};

pub const PARSE_MAX_TOKENS: u32 = 8000;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const BUSINESS_DOC_MAX_TOKENS: u32 = 8000;
pub const APPLICATION_LOGIC_MAX_TOKENS: u32 = 8000;
pub const RECOMMENDATION_MAX_TOKENS: u32 = 5000;
pub const SPRING_STRUCTURE_MAX_TOKENS: u32 = 6000;
pub const JAVA_CONVERSION_MAX_TOKENS: u32 = 10000;

const MARKDOWN_RECOMMENDATIONS: &str =
    "Return the recommendations in markdown format with clear headings and explanations.";

// =============================================================================
// Step 1: Parse
// =============================================================================

const PARSE_TEMPLATE: &str = r#"# Enhanced Prompt for Parsing Modern RPGLE Code

You are a specialized RPGLE code parser tasked with extracting structured information from modern RPGLE source code. Your output MUST strictly adhere to the requested JSON format and include ALL required lists.

## Primary Task

Analyze the provided RPGLE code and produce a comprehensive JSON representation that captures all structural elements, focusing especially on the 11 MANDATORY lists specified below.

## CRITICAL INSTRUCTIONS

1. **YOU MUST return the EXACT JSON structure specified.** Do not use alternative key names or structures.
2. **STRUCTURE IS MORE IMPORTANT THAN COMPLETENESS**: If you cannot analyze all details, prioritize providing all 11 required lists in the correct structure with whatever information you can extract.
3. **The top-level structure MUST include "programName", "programType", "programPurpose", and "requiredLists" with all 11 mandatory sublists.**
4. **If any list would be empty, include it with an empty array**: `"bindingDirectories": []`

## IMPORTANT: Required Lists

THE FOLLOWING 11 LISTS ARE MANDATORY AND MUST BE INCLUDED UNDER "requiredLists":

1. **Subprocedures List**
2. **Databases List**
3. **Database Keys List**
4. **Modules List**
5. **Binding Directories List**
6. **Copy Books List**
7. **Indexes and Key Sets List**
8. **Input Parameters List**
9. **Core Logic Sections List**
10. **External Programs List**
11. **File Operations List**

## RPGLE Code to Parse:

```rpgle
{content}
```

REMEMBER:
- You MUST include ALL 11 required lists in your output exactly as specified
- The JSON structure MUST be followed precisely
- All cross-references must be accurate
- If you can't find information for a list, include it with an empty array
- Prioritize structure compliance over comprehensive analysis
"#;

pub fn parse(content: &str) -> String {
    PARSE_TEMPLATE.replace("{content}", content)
}

// =============================================================================
// Steps 2-4: Per-file JSON extraction
// =============================================================================

fn json_extraction(task: &str, aspects: &[&str], keys: &[&str], content: &str) -> String {
    PromptBuilder::new()
        .numbered_section(task, aspects.iter().copied())
        .bullets("Return the results in JSON format with these keys:", keys.iter().copied())
        .text("Here's the RPGLE code:")
        .code("", content)
        .build()
}

pub fn dependencies(content: &str) -> String {
    json_extraction(
        "Analyze this RPGLE code and identify all dependencies:",
        &[
            "External program calls (CALL, CALLP)",
            "File/database accesses",
            "Data structure includes or copybooks",
            "Other module imports",
        ],
        &[
            "program_calls: [list of called programs]",
            "file_accesses: [list of files/tables accessed]",
            "copybooks: [list of included copybooks/data structures]",
            "imports: [list of imported modules]",
            "brief_summary: short description of what this program does",
        ],
        content,
    )
}

pub fn formats(content: &str) -> String {
    json_extraction(
        "Analyze this RPGLE code and identify all format specifications and their usage:",
        &[
            "F-spec (file specifications)",
            "D-spec (definition specifications)",
            "P-spec (procedure specifications)",
            "C-spec (calculation specifications)",
            "Modern free-format statements",
        ],
        &[
            "format_type: \"fixed\" or \"free\" or \"mixed\"",
            "spec_counts: {\"F\": 0, \"D\": 0, \"P\": 0, \"C\": 0, \"free\": 0}",
            "complex_formats: [list of complex format types found]",
            "data_structures: [list of data structure names and their purpose]",
            "file_formats: [list of file formats used]",
        ],
        content,
    )
}

pub fn metadata(content: &str) -> String {
    json_extraction(
        "Extract detailed metadata from this RPGLE program:",
        &[
            "Program name and purpose",
            "Author information (if available)",
            "Creation date and modification history (if available)",
            "Input parameters and return values",
            "Global variables and constants",
            "Main procedures/subroutines and their purpose",
            "Business rules implemented",
        ],
        &[
            "program_name: name of the program",
            "purpose: main purpose of the program",
            "author: author information",
            "creation_date: creation date",
            "parameters: [list of input parameters]",
            "return_values: [list of return values]",
            "globals: [list of global variables]",
            "procedures: [list of procedures and their purpose]",
            "business_rules: [list of business rules implemented]",
        ],
        content,
    )
}

// =============================================================================
// Step 5: Business Documentation
// =============================================================================

const BUSINESS_DOCS_TEMPLATE: &str = r#"# RPGLE Program Business Documentation Generation Prompt

## Task Overview

Generate a comprehensive business documentation for an RPGLE program that explains its purpose, functionality, and business rules in a format accessible to both technical and non-technical stakeholders. The documentation should present the program's business logic with clear explanations, leveraging both code analysis and embedded comments, and include visual diagrams to enhance understanding.

## Document Structure Requirements

Your documentation must include the following sections in this order:

### 1. Program Overview
   - **Program Name and Type**: Identify the program name, type (service program, module, etc.)
   - **Business Purpose**: Summarize the primary business function in 1-2 paragraphs
   - **System Context**: Explain where this program fits in the broader application landscape
   - **Key Business Functions**: Bullet list of main business capabilities

### 2. Business Process Flow
   - **Mermaid Process Diagram**: Create a Mermaid flowchart showing the main business process steps
   - **Process Triggers**: What business events initiate this program
   - **Process Outcomes**: Expected business results after successful execution
   - **Integration Points**: Other systems or programs this interacts with

### 3. Business Rules Inventory
   - Categorize all business rules by functional area
   - For each rule include:
     - Rule ID and descriptive name
     - Plain English description
     - Business purpose/justification
     - Conditions when the rule applies
     - Exceptions to the rule
     - Implementation notes (which procedures/subroutines implement this rule)
   - **Decision Tree Diagram**: Include a Mermaid diagram for complex rule hierarchies

### 4. Data Structures and Business Entities
   - Document the key business entities represented
   - Explain the purpose of major data structures from a business perspective
   - Define important fields and their business significance
   - Note any business validation rules applied to fields
   - **Entity Relationship Diagram**: Mermaid diagram showing relationships between key data structures

### 5. Calculation Logic
   - Document all business calculations with:
     - Purpose of the calculation
     - Business formula in plain English
     - Variables used and their business meaning
     - Sample calculation examples where possible
   - **Algorithm Flowchart**: Mermaid diagram for complex calculation workflows

### 6. Error Handling and Business Exceptions
   - List all business error scenarios
   - Explain the business impact of each error
   - Document recovery paths and alternative flows
   - Explain rejection codes in business terms
   - **Error Flow Diagram**: Mermaid diagram showing error paths and recovery options

### 7. Integration Dependencies
   - Document all external systems this program connects with
   - Explain what business data is exchanged
   - Note any special business handling for integration failures
   - **Integration Map**: Mermaid diagram showing system integration points

### 8. Program Architecture
   - **Procedures Map**: Mermaid diagram showing relationships between procedures
   - **Data Flow Diagram**: Visual representation of how data moves through the program
   - **Component Diagram**: Show relationships between program components

### 9. Required Program Elements
   - **Subprocedures**: List all subprocedures with their business function, complexity, and error handling
   - **Databases**: Document all databases with their business purpose and access patterns
   - **Database Keys**: Explain key fields and their business significance
   - **Modules**: List all modules with their business purpose and dependencies
   - **Binding Directories**: Document binding directories and their business context
   - **Copy Books**: Explain copy books and their business significance
   - **Indexes and Key Sets**: Document their business purpose and usage
   - **Input Parameters**: Explain from a business perspective
   - **Core Logic Sections**: Identify critical business logic areas
   - **External Programs**: Document business integration points
   - **File Operations**: Explain business purpose of file operations

### 10. Business Glossary
   - Define all business-specific terms used in the program
   - Explain technical terms in business language
   - Map technical field names to business concepts

### 11. Change History
   - Document significant business functionality changes
   - Note the business reasons for major modifications
   - Track evolution of business rules

## Mermaid Diagram Specifications

Include the following Mermaid diagrams in your documentation:

1. **Business Process Flowchart**:
   ```
   flowchart TD
     Start[Business Trigger] --> Process1[First Process Step]
     Process1 --> Decision{Decision Point}
     Decision --> |Condition A| Process2[Process A]
     Decision --> |Condition B| Process3[Process B]
     Process2 --> End[Business Outcome]
     Process3 --> End
   ```

2. **Decision Tree for Business Rules**:
   ```
   flowchart TD
     Start[Rule Evaluation] --> Condition1{Condition 1}
     Condition1 --> |True| Action1[Execute Action 1]
     Condition1 --> |False| Condition2{Condition 2}
     Condition2 --> |True| Action2[Execute Action 2]
     Condition2 --> |False| Action3[Execute Action 3]
   ```

3. **Data Flow Diagram**:
   ```
   flowchart LR
     InputData[Input Data] --> Process1[Process 1]
     Process1 --> DataStore[(Data Store)]
     DataStore --> Process2[Process 2]
     Process2 --> OutputData[Output Data]
   ```

4. **System Integration Map**:
   ```
   flowchart TD
     ThisProgram[This Program] --> |Data Exchange 1| ExternalSystem1[External System 1]
     ThisProgram --> |Data Exchange 2| ExternalSystem2[External System 2]
     ExternalSystem1 --> |Response Data| ThisProgram
   ```

5. **Component Relationship Diagram**:
   ```
   classDiagram
     class MainProgram
     class Subprocedure1
     class Subprocedure2
     class ExternalProgram

     MainProgram --> Subprocedure1 : calls
     MainProgram --> Subprocedure2 : calls
     Subprocedure2 --> ExternalProgram : integrates with
   ```

## Program Analysis Input

Here is the parsed JSON representation of the RPGLE program to analyze:

```json
{program_json}
```

And here is the original RPGLE code:

```rpgle
{rpgle_code}
```

Please generate the business documentation based on both the parsed representation and the original source code.
"#;

pub fn business_docs(program_json: &str, rpgle_code: &str) -> String {
    // Source goes in last so markers inside it survive
    BUSINESS_DOCS_TEMPLATE
        .replace("{program_json}", program_json)
        .replacen("{rpgle_code}", rpgle_code, 1)
}

// =============================================================================
// Step 7: Application Business Logic
// =============================================================================

const APPLICATION_LOGIC_TEMPLATE: &str = r#"# Application Business Logic Analysis

## Task Overview

Create a comprehensive application-level business logic document by analyzing the relationships between multiple RPGLE programs. This document should describe the overall business functionality of the application, how different programs interact, and provide a holistic view of the business processes implemented by the set of programs.

## Input Data

I have analyzed multiple RPGLE programs and identified the following relationships and business logic:

```json
{app_info_json}
```

## Required Document Sections

Please create a comprehensive application business logic document with the following sections:

### 1. Application Overview
- Application name (infer from program names/purposes)
- Overall business purpose
- Key business capabilities
- Primary business processes supported

### 2. System Architecture
- High-level architecture diagram (Mermaid format)
- Program interactions and dependencies
- Data flow between components
- External system integrations

### 3. Business Domain Model
- Core business entities and their relationships
- Key business concepts
- Domain terminology

### 4. Primary Business Workflows
- Main business processes from start to finish
- Process flow diagrams (Mermaid format)
- Decision points and business rules
- Exception handling paths

### 5. Data Management
- Database usage patterns
- Key data entities and their business purpose
- Data validation and business rules
- Data transformation processes

### 6. Integration Points
- External system dependencies
- Data exchange patterns
- Integration challenges and solutions

### 7. Business Rules Catalog
- Consolidated list of business rules across programs
- Rule categorization by business area
- Rule implementation details

### 8. Modernization Considerations
- Legacy design patterns identified
- Suggested improvements for modern architecture
- Business function to microservice mapping
- Suggested Java/Spring Boot implementation approach

## Mermaid Diagram Requirements

Include at least these Mermaid diagrams:

1. **Application Component Diagram**:
```
flowchart TD
  subgraph "Application Components"
    Program1[Program 1] --> Program2[Program 2]
    Program1 --> Program3[Program 3]
    Program2 --> Database[(Database)]
  end
  subgraph "External Systems"
    Program3 --> ExternalSystem[External System]
  end
```

2. **Business Process Workflow**:
```
flowchart TD
  Start[Business Trigger] --> Process1[Process 1]
  Process1 --> Decision{Decision Point}
  Decision -->|Condition A| Process2[Process 2]
  Decision -->|Condition B| Process3[Process 3]
  Process2 --> End[Business Outcome]
  Process3 --> End
```

3. **Domain Entity Relationship Diagram**:
```
classDiagram
  class Entity1 {
    +attribute1
    +attribute2
  }
  class Entity2 {
    +attribute1
    +attribute2
  }
  Entity1 "1" --> "many" Entity2: contains
```

## Output Format

The document should be formatted in Markdown with proper headings, lists, tables, and Mermaid diagrams.
"#;

pub fn application_logic(app_info_json: &str) -> String {
    APPLICATION_LOGIC_TEMPLATE.replace("{app_info_json}", app_info_json)
}

// =============================================================================
// Step 8: Recommendations
// =============================================================================

pub fn architecture(programs_json: &str) -> String {
    PromptBuilder::new()
        .text(
            "Based on the analysis of these RPGLE programs, generate comprehensive Java architecture \
             recommendations for a Spring Boot conversion.",
        )
        .text("Program details:")
        .code("", programs_json)
        .numbered_section(
            "Generate detailed architectural recommendations including:",
            [
                "Overall architecture pattern (e.g., layered, hexagonal, microservices, etc.)",
                "Component structure",
                "Dependency management approach",
                "Data access strategy",
                "Service organization",
                "Error handling strategy",
                "Cross-cutting concerns (logging, security, etc.)",
                "Testing strategy",
            ],
        )
        .text(MARKDOWN_RECOMMENDATIONS)
        .build()
}

pub fn domain(business_concepts_json: &str, data_structures_json: &str) -> String {
    PromptBuilder::new()
        .text(
            "Based on the RPGLE analysis, recommend domain package organization for a Spring Boot \
             application.",
        )
        .text("Business concepts identified:")
        .code("", business_concepts_json)
        .text("Data structures identified:")
        .code("", data_structures_json)
        .numbered_section(
            "Please provide:",
            [
                "Main domain entities that should be created",
                "Package structure organization (e.g., by business function, by entity, etc.)",
                "Entity relationships and recommendations",
                "Java class diagrams (in text format) for key domain objects",
                "Recommendations for using Spring Data JPA entities",
            ],
        )
        .text(MARKDOWN_RECOMMENDATIONS)
        .build()
}

pub fn service_boundaries(procedures_json: &str, call_dependencies_json: &str) -> String {
    PromptBuilder::new()
        .text(
            "Based on the RPGLE analysis, recommend service boundaries for a Spring Boot application.",
        )
        .text("Procedures identified across all programs:")
        .code("", procedures_json)
        .text("Program call dependencies:")
        .code("", call_dependencies_json)
        .numbered_section(
            "Please provide:",
            [
                "Recommended service boundaries and their justification",
                "Service interface definitions (in Java format)",
                "Service implementation recommendations",
                "Communication patterns between services",
                "Recommendations for API design",
                "Transaction boundary considerations",
            ],
        )
        .text(format!(
            "Focus on creating cohesive services with clear responsibilities and minimal coupling.\n{}",
            MARKDOWN_RECOMMENDATIONS
        ))
        .build()
}

pub fn spring_structure(
    program_names: &[String],
    program_purposes: &[String],
    file_accesses: &[String],
) -> String {
    PromptBuilder::new()
        .text("Based on the RPGLE analysis, generate a complete Spring Boot project structure.")
        .context_item("Program names", program_names.join(", "))
        .context_item("Program purposes", program_purposes.join(", "))
        .context_item("Database files accessed", file_accesses.join(", "))
        .numbered_section(
            "Please provide:",
            [
                "Project configuration (build.gradle or pom.xml)",
                "Complete package structure with explanations",
                "Main application class",
                "Configuration classes",
                "Controller, Service, and Repository layer organization",
                "Sample implementations for key components",
                "Database configuration",
                "Testing structure",
            ],
        )
        .text(
            "Return the recommendations as a complete project structure with file paths and code examples.\n\
             Use markdown format with clear headings, and include code blocks for each file.",
        )
        .build()
}

/// Join a JSON list for inline prompt text. Strings are used as-is, other
/// values in compact JSON form.
fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn str_or_unknown<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or(UNKNOWN)
}

pub fn conversion_plan(metadata: &Value, dependencies: &Value) -> String {
    PromptBuilder::new()
        .text(
            "Based on the RPGLE analysis, generate a detailed Spring Boot conversion plan for this \
             program. Consider:",
        )
        .text(format!(
            "1. Program metadata:\n- Program name: {}\n- Purpose: {}\n- Procedures: {}",
            str_or_unknown(metadata, "program_name"),
            str_or_unknown(metadata, "purpose"),
            join_values(json_array(metadata, "procedures")),
        ))
        .text(format!(
            "2. Dependencies:\n- Program calls: {}\n- File accesses: {}",
            join_values(json_array(dependencies, "program_calls")),
            join_values(json_array(dependencies, "file_accesses")),
        ))
        .text(format!(
            "3. Business rules: {}",
            join_values(json_array(metadata, "business_rules"))
        ))
        .bullets(
            "Create a detailed conversion plan that includes:",
            [
                "Spring Boot project structure (packages, classes)",
                "How to map RPGLE procedures to Java methods",
                "How to handle database access",
                "How to implement business rules",
                "Sample Java code for 1-2 key procedures",
            ],
        )
        .text("Return the results in markdown format suitable for display.")
        .build()
}

// =============================================================================
// Step 9: Java Conversion
// =============================================================================

/// Inputs for the per-program Java conversion prompt
#[derive(Debug, Clone)]
pub struct JavaConversionInput<'a> {
    pub program_name: &'a str,
    pub filename: &'a str,
    pub base_name: &'a str,
    /// Business documentation excerpt; empty when none was generated
    pub business_logic: &'a str,
    pub code: &'a str,
}

pub fn java_conversion(input: &JavaConversionInput<'_>) -> String {
    let business_logic = if input.business_logic.is_empty() {
        "No business logic analysis available."
    } else {
        input.business_logic
    };
    let base = input.base_name;

    PromptBuilder::new()
        .text("# RPGLE to Spring Boot Java Conversion")
        .section(
            "## Task",
            "Convert this RPGLE program to Spring Boot Java code. Generate ALL necessary Java files for a \
             complete working application.",
        )
        .text("## RPGLE Program Details")
        .context_item("Program Name", input.program_name)
        .context_item("Filename", input.filename)
        .section("## Business Logic Summary", business_logic)
        .text("## RPGLE Code to Convert")
        .code("rpgle", input.code)
        .numbered_section(
            "## Required Output:\nGenerate ALL of the following Java files:\n",
            [
                "Entity Classes: Convert all RPGLE data structures to Java entity classes",
                "Service Class: Convert main program and procedures to a service class",
                "Repository Interface: Create interface for database operations",
                "Controller Class: Create a REST controller for API access",
                "Configuration: Any needed configuration classes",
            ],
        )
        .bullets(
            "Use these naming conventions:",
            [
                format!("Entity: {base}Entity and other entity names based on data structures"),
                format!("Service: {base}Service"),
                format!("Repository: {base}Repository"),
                format!("Controller: {base}Controller"),
            ],
        )
        .numbered_section(
            "For each file:",
            [
                "Provide the full file path (e.g., src/main/java/com/example/controller/MyController.java)",
                "Provide the COMPLETE Java code for that file including ALL package declarations, imports, \
                 and code",
            ],
        )
        .bullets(
            "IMPORTANT GUIDELINES:",
            [
                "Include Spring Boot annotations (@Service, @Repository, @RestController, etc.)",
                "Convert ALL RPGLE business logic to equivalent Java code",
                "Map ALL RPGLE data structures to Java classes",
                "Map ALL RPGLE procedures to Java methods",
                "Convert ALL RPGLE database operations to Spring Data JPA",
                "Include ALL Javadoc comments",
                "Follow Spring Boot best practices",
                "Make sure to properly handle types, enums, constants, etc.",
                "Include error handling",
                "Code must be COMPLETE and READY TO USE - no placeholder comments",
            ],
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_embeds_full_content() {
        let prompt = parse("**FREE\nctl-opt main(run);");
        assert!(prompt.contains("```rpgle\n**FREE\nctl-opt main(run);\n```"));
        assert!(prompt.contains("11 MANDATORY lists"));
        assert!(!prompt.contains("{content}"));
    }

    #[test]
    fn test_dependencies_prompt_shape() {
        let prompt = dependencies("CALLP \"VALIDATE\"");
        assert!(prompt.starts_with("Analyze this RPGLE code and identify all dependencies:\n1. External"));
        assert!(prompt.contains("- program_calls: [list of called programs]"));
        assert!(prompt.contains("- brief_summary:"));
        assert!(prompt.ends_with("```\nCALLP \"VALIDATE\"\n```"));
    }

    #[test]
    fn test_formats_and_metadata_keys() {
        assert!(formats("x").contains("spec_counts: {\"F\": 0, \"D\": 0, \"P\": 0, \"C\": 0, \"free\": 0}"));
        let meta = metadata("x");
        assert!(meta.contains("7. Business rules implemented"));
        assert!(meta.contains("- business_rules: [list of business rules implemented]"));
    }

    #[test]
    fn test_business_docs_placeholders_filled_once() {
        let prompt = business_docs("{\"programName\": \"P\"}", "dsply '{program_json}';");
        assert!(prompt.contains("```json\n{\"programName\": \"P\"}\n```"));
        assert!(prompt.contains("dsply '{program_json}';"));
        assert!(!prompt.contains("{rpgle_code}"));
    }

    #[test]
    fn test_conversion_plan_defaults_to_unknown() {
        let prompt = conversion_plan(&json!({}), &json!({"program_calls": ["VALIDATE", {"name": "X"}]}));
        assert!(prompt.contains("- Program name: Unknown"));
        assert!(prompt.contains("- Purpose: Unknown"));
        assert!(prompt.contains("- Program calls: VALIDATE, {\"name\":\"X\"}"));
        assert!(prompt.contains("3. Business rules: \n"));
    }

    #[test]
    fn test_spring_structure_lists() {
        let prompt = spring_structure(
            &["ORDENTRY".to_string(), "INVUPD".to_string()],
            &["Order entry".to_string()],
            &["ORDHDR".to_string()],
        );
        assert!(prompt.contains("Program names: ORDENTRY, INVUPD"));
        assert!(prompt.contains("Database files accessed: ORDHDR"));
    }

    #[test]
    fn test_java_conversion_naming() {
        let prompt = java_conversion(&JavaConversionInput {
            program_name: "ORDER_ENTRY",
            filename: "ORDER_ENTRY.rpgle",
            base_name: "OrderEntry",
            business_logic: "",
            code: "dcl-s x int(10);",
        });
        assert!(prompt.contains("## RPGLE Program Details\n\nProgram Name: ORDER_ENTRY\nFilename: ORDER_ENTRY.rpgle"));
        assert!(prompt.contains("- Service: OrderEntryService"));
        assert!(prompt.contains("No business logic analysis available."));
        assert!(prompt.contains("```rpgle\ndcl-s x int(10);\n```"));
    }
}

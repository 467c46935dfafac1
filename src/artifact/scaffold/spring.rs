//! Spring Boot scaffolding.
//!
//! Two flows produce Java projects. Batch analysis converts each program and
//! then fills in a `com.example` application shell. The single-file flow
//! gets a layered structure from the model and completes whatever is missing
//! under the package the model chose.

use crate::extract::JavaStructure;
use crate::types::GeneratedArtifact;

// =============================================================================
// Batch analysis project
// =============================================================================

pub const ANALYSIS_APPLICATION_PATH: &str = "src/main/java/com/example/Application.java";
pub const APPLICATION_PROPERTIES_PATH: &str = "src/main/resources/application.properties";

const ANALYSIS_APPLICATION: &str = r#"package com.example;

import org.springframework.boot.SpringApplication;
import org.springframework.boot.autoconfigure.SpringBootApplication;

/**
 * Main Spring Boot Application class
 * Generated from RPGLE conversion
 */
@SpringBootApplication
public class Application {
    public static void main(String[] args) {
        SpringApplication.run(Application.class, args);
    }
}
"#;

const APPLICATION_PROPERTIES: &str = r#"# Spring Boot application properties
# Generated from RPGLE conversion

# Server configuration
server.port=8080

# Database configuration
spring.datasource.url=jdbc:h2:mem:testdb
spring.datasource.driverClassName=org.h2.Driver
spring.datasource.username=sa
spring.datasource.password=password
spring.jpa.database-platform=org.hibernate.dialect.H2Dialect

# JPA/Hibernate configuration
spring.jpa.hibernate.ddl-auto=update
spring.jpa.show-sql=true

# H2 Console configuration
spring.h2.console.enabled=true
spring.h2.console.path=/h2-console
"#;

const ANALYSIS_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 https://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <parent>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-starter-parent</artifactId>
        <version>2.7.17</version>
        <relativePath/>
    </parent>

    <groupId>com.example</groupId>
    <artifactId>rpgle-converted-app</artifactId>
    <version>0.0.1-SNAPSHOT</version>
    <name>RPGLE Converted Application</name>
    <description>Spring Boot application converted from RPGLE code</description>

    <properties>
        <java.version>11</java.version>
    </properties>

    <dependencies>
        <!-- Spring Boot Starters -->
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-web</artifactId>
        </dependency>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-data-jpa</artifactId>
        </dependency>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-validation</artifactId>
        </dependency>

        <!-- Database -->
        <dependency>
            <groupId>com.h2database</groupId>
            <artifactId>h2</artifactId>
            <scope>runtime</scope>
        </dependency>

        <!-- Lombok for boilerplate reduction -->
        <dependency>
            <groupId>org.projectlombok</groupId>
            <artifactId>lombok</artifactId>
            <optional>true</optional>
        </dependency>

        <!-- Testing -->
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-test</artifactId>
            <scope>test</scope>
        </dependency>
    </dependencies>

    <build>
        <plugins>
            <plugin>
                <groupId>org.springframework.boot</groupId>
                <artifactId>spring-boot-maven-plugin</artifactId>
                <configuration>
                    <excludes>
                        <exclude>
                            <groupId>org.projectlombok</groupId>
                            <artifactId>lombok</artifactId>
                        </exclude>
                    </excludes>
                </configuration>
            </plugin>
        </plugins>
    </build>
</project>
"#;

const ANALYSIS_README_HEAD: &str = r#"# RPGLE to Spring Boot Converted Application

This Spring Boot application was automatically generated from RPGLE source code using an LLM-based conversion tool.

## Project Structure

The project follows a standard Spring Boot architecture:

- `src/main/java/com/example/domain/` - Entity classes converted from RPGLE data structures
- `src/main/java/com/example/repository/` - Data access interfaces for database operations
- `src/main/java/com/example/service/` - Business logic services converted from RPGLE programs
- `src/main/java/com/example/controller/` - REST API controllers for accessing the services

## Converted RPGLE Programs

The following RPGLE programs were converted:

"#;

const ANALYSIS_README_TAIL: &str = r#"
## How to Run

1. Make sure you have Java 11+ and Maven installed
2. Clone this repository
3. Run `mvn spring-boot:run` to start the application
4. Access the H2 console at http://localhost:8080/h2-console (JDBC URL: jdbc:h2:mem:testdb, Username: sa, Password: password)
5. Access the REST API at http://localhost:8080/api/...

## Notes on Conversion

- The conversion process attempted to maintain the business logic from the original RPGLE code
- Data structures were converted to JPA entities
- File operations were converted to Spring Data repository methods
- Business logic in procedures was converted to service methods
- REST API endpoints were added for accessing the functionality
"#;

fn analysis_readme<'a>(converted: impl IntoIterator<Item = &'a str>) -> String {
    let mut readme = ANALYSIS_README_HEAD.to_string();
    for name in converted {
        readme.push_str(&format!("- `{name}` - Converted to Java classes\n"));
    }
    readme.push_str(ANALYSIS_README_TAIL);
    readme
}

/// Shell files for the batch conversion project.
///
/// The application class, properties and pom are added only when `exists`
/// reports them missing; the README listing the converted programs is
/// always regenerated.
pub fn analysis_project_files<'a>(
    converted: impl IntoIterator<Item = &'a str>,
    exists: impl Fn(&str) -> bool,
) -> Vec<GeneratedArtifact> {
    let mut files: Vec<GeneratedArtifact> = [
        (ANALYSIS_APPLICATION_PATH, ANALYSIS_APPLICATION),
        (APPLICATION_PROPERTIES_PATH, APPLICATION_PROPERTIES),
        ("pom.xml", ANALYSIS_POM),
    ]
    .into_iter()
    .filter(|(path, _)| !exists(path))
    .map(|(path, content)| GeneratedArtifact::new(path, content))
    .collect();

    files.push(GeneratedArtifact::new("README.md", analysis_readme(converted)));
    files
}

// =============================================================================
// Single-file modernization project
// =============================================================================

const MINIMAL_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 https://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>

    <parent>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-starter-parent</artifactId>
        <version>2.7.0</version>
        <relativePath/>
    </parent>

    <groupId>com.company</groupId>
    <artifactId>rpg-modernized-app</artifactId>
    <version>0.0.1-SNAPSHOT</version>
    <name>RPG Modernized Application</name>
    <description>Spring Boot application generated from RPG code</description>

    <properties>
        <java.version>11</java.version>
    </properties>

    <dependencies>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-web</artifactId>
        </dependency>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-data-jpa</artifactId>
        </dependency>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-validation</artifactId>
        </dependency>
        <dependency>
            <groupId>com.h2database</groupId>
            <artifactId>h2</artifactId>
            <scope>runtime</scope>
        </dependency>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-test</artifactId>
            <scope>test</scope>
        </dependency>
    </dependencies>

    <build>
        <plugins>
            <plugin>
                <groupId>org.springframework.boot</groupId>
                <artifactId>spring-boot-maven-plugin</artifactId>
            </plugin>
        </plugins>
    </build>
</project>
"#;

const STRUCTURE_README: &str = r#"# RPG Modernized Java Application

This is a Spring Boot application generated from RPG code.

## Structure

- `src/main/java/{package_path}`: Java source files
  - `controller/`: REST API controllers
  - `service/`: Business logic services
  - `repository/`: Data access repositories
  - `dto/`: Data Transfer Objects
  - `model/`: Entity models

## How to run

1. Ensure Java 11+ and Maven are installed
2. Run `mvn clean install` to build the application
3. Run `mvn spring-boot:run` to start the application
4. Access the API at http://localhost:8080

## Generated from

This application was generated using AI-powered RPG Modernization Assistant.
"#;

const APPLICATION_CLASS: &str = r#"package {package};

import org.springframework.boot.SpringApplication;
import org.springframework.boot.autoconfigure.SpringBootApplication;

@SpringBootApplication
public class {name} {
    public static void main(String[] args) {
        SpringApplication.run({name}.class, args);
    }
}
"#;

const FALLBACK_APPLICATION_CLASS: &str = r#"package {package};

import org.springframework.boot.SpringApplication;
import org.springframework.boot.autoconfigure.SpringBootApplication;

/**
 * Main Spring Boot Application class
 */
@SpringBootApplication
public class ModernizedRpgApplication {
    public static void main(String[] args) {
        SpringApplication.run(ModernizedRpgApplication.class, args);
    }
}
"#;

const FALLBACK_CONTROLLER: &str = r#"package {package}.controller;

import org.springframework.beans.factory.annotation.Autowired;
import org.springframework.http.ResponseEntity;
import org.springframework.web.bind.annotation.*;

/**
 * REST API Controller
 */
@RestController
@RequestMapping("/api")
public class MainController {

    @GetMapping("/status")
    public ResponseEntity<String> getStatus() {
        return ResponseEntity.ok("Service is running");
    }

    @PostMapping("/process")
    public ResponseEntity<String> processData(@RequestBody String requestData) {
        // This would call appropriate service methods to process the data
        return ResponseEntity.ok("Data processed successfully");
    }
}
"#;

const FALLBACK_SERVICE: &str = r#"package {package}.service;

/**
 * Service interface for business logic
 */
public interface BusinessService {
    String processData(String input);
    boolean validateData(String input);
}
"#;

const FALLBACK_SERVICE_IMPL: &str = r#"package {package}.service;

import org.springframework.stereotype.Service;

/**
 * Service implementation for business logic
 */
@Service
public class BusinessServiceImpl implements BusinessService {

    @Override
    public String processData(String input) {
        // TODO: Implement business logic here based on the RPG logic
        return "Processed: " + input;
    }

    @Override
    public boolean validateData(String input) {
        // TODO: Implement validation logic
        return input != null && !input.isEmpty();
    }
}
"#;

fn with_package(template: &str, package: &str) -> String {
    template.replace("{package}", package)
}

/// `com.acme.orders` -> `OrdersApplication`
fn application_name(base_package: &str) -> String {
    let last = base_package.rsplit('.').next().unwrap_or_default();
    format!("{}Application", crate::types::capitalize_first(last))
}

fn any_path(files: &[GeneratedArtifact], needle: &str) -> bool {
    files
        .iter()
        .any(|f| f.path.to_string_lossy().contains(needle))
}

/// Complete a model-provided Spring Boot structure.
///
/// Without a controller an `{Last}Application` entry point is added under the
/// base package. A pom and README are supplied when missing. After that any
/// project still lacking an `*Application.java`, a controller or a service
/// gets a minimal placeholder for each.
pub fn complete_structure(structure: JavaStructure) -> Vec<GeneratedArtifact> {
    let package_dir = structure.package_dir();
    let package = structure.base_package;
    let mut files = structure.files;

    let has_controller = files
        .iter()
        .any(|f| f.path.to_string_lossy().to_lowercase().contains("controller"));
    if !has_controller {
        let name = application_name(&package);
        let content = APPLICATION_CLASS
            .replace("{package}", &package)
            .replace("{name}", &name);
        files.push(GeneratedArtifact::new(
            format!("{package_dir}/{name}.java"),
            content,
        ));
    }
    if !any_path(&files, "pom.xml") {
        files.push(GeneratedArtifact::new("pom.xml", MINIMAL_POM));
    }
    if !any_path(&files, "README.md") {
        files.push(GeneratedArtifact::new(
            "README.md",
            STRUCTURE_README.replace("{package_path}", &package.replace('.', "/")),
        ));
    }

    if !any_path(&files, "Application.java") {
        files.push(GeneratedArtifact::new(
            format!("{package_dir}/ModernizedRpgApplication.java"),
            with_package(FALLBACK_APPLICATION_CLASS, &package),
        ));
    }
    if !any_path(&files, "Controller.java") {
        files.push(GeneratedArtifact::new(
            format!("{package_dir}/controller/MainController.java"),
            with_package(FALLBACK_CONTROLLER, &package),
        ));
    }
    if !any_path(&files, "Service.java") {
        files.push(GeneratedArtifact::new(
            format!("{package_dir}/service/BusinessService.java"),
            with_package(FALLBACK_SERVICE, &package),
        ));
        files.push(GeneratedArtifact::new(
            format!("{package_dir}/service/BusinessServiceImpl.java"),
            with_package(FALLBACK_SERVICE_IMPL, &package),
        ));
    }
    files
}

/// Insert generated methods before the last closing brace of the first
/// `*ServiceImpl.java`. Returns whether a file was changed.
pub fn integrate_java_methods(files: &mut [GeneratedArtifact], methods: &[String]) -> bool {
    if methods.is_empty() {
        return false;
    }
    let Some(target) = files
        .iter_mut()
        .find(|f| f.path.to_string_lossy().contains("ServiceImpl.java"))
    else {
        return false;
    };
    let Some(idx) = target.content.rfind('}') else {
        return false;
    };

    let (head, tail) = target.content.split_at(idx);
    target.content = format!("{}\n\n{}\n\n{}", head.trim_end(), methods.join("\n\n"), tail);
    true
}

/// Append generated functions to `logic_module.py`. Returns whether a file
/// was changed.
pub fn integrate_python_functions(files: &mut [GeneratedArtifact], functions: &[String]) -> bool {
    if functions.is_empty() {
        return false;
    }
    let Some(target) = files
        .iter_mut()
        .find(|f| f.path.to_string_lossy().contains("logic_module.py"))
    else {
        return false;
    };

    target.content = format!("{}\n\n{}", target.content.trim_end(), functions.join("\n\n"));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(files: &[GeneratedArtifact]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_analysis_project_respects_existing_files() {
        let files = analysis_project_files(["ORDENTRY.rpgle", "CUSTUPD.rpgle"], |p| p == "pom.xml");
        assert_eq!(
            paths(&files),
            vec![ANALYSIS_APPLICATION_PATH, APPLICATION_PROPERTIES_PATH, "README.md"]
        );
        let readme = &files[2].content;
        assert!(readme.contains("- `ORDENTRY.rpgle` - Converted to Java classes\n"));
        assert!(readme.contains("- `CUSTUPD.rpgle` - Converted to Java classes\n"));
        assert!(readme.contains("## How to Run"));
    }

    #[test]
    fn test_complete_empty_structure() {
        let structure = JavaStructure {
            base_package: "com.acme.orders".to_string(),
            files: Vec::new(),
        };
        let files = complete_structure(structure);
        assert_eq!(
            paths(&files),
            vec![
                "src/main/java/com/acme/orders/OrdersApplication.java",
                "pom.xml",
                "README.md",
                "src/main/java/com/acme/orders/controller/MainController.java",
                "src/main/java/com/acme/orders/service/BusinessService.java",
                "src/main/java/com/acme/orders/service/BusinessServiceImpl.java",
            ]
        );
        assert!(files[0].content.contains("SpringApplication.run(OrdersApplication.class, args);"));
        assert!(files[1].content.contains("<artifactId>rpg-modernized-app</artifactId>"));
        assert!(files[2].content.contains("`src/main/java/com/acme/orders`"));
        assert!(files[3].content.starts_with("package com.acme.orders.controller;"));
    }

    #[test]
    fn test_complete_keeps_model_files() {
        let structure = JavaStructure {
            base_package: "com.acme".to_string(),
            files: vec![
                GeneratedArtifact::new(
                    "src/main/java/com/acme/controller/OrderController.java",
                    "class OrderController {}",
                ),
                GeneratedArtifact::new(
                    "src/main/java/com/acme/service/OrderService.java",
                    "interface OrderService {}",
                ),
                GeneratedArtifact::new("pom.xml", "<project/>"),
            ],
        };
        let files = complete_structure(structure);
        let all = paths(&files);
        assert!(all.contains(&"src/main/java/com/acme/ModernizedRpgApplication.java".to_string()));
        assert!(!all.iter().any(|p| p.ends_with("MainController.java")));
        assert!(!all.iter().any(|p| p.ends_with("BusinessService.java")));
        assert_eq!(files.iter().filter(|f| f.path.ends_with("pom.xml")).count(), 1);
    }

    #[test]
    fn test_integrate_java_methods() {
        let mut files = vec![GeneratedArtifact::new(
            "src/main/java/a/service/BusinessServiceImpl.java",
            "public class BusinessServiceImpl {\n    void a() {}\n}\n",
        )];
        let changed = integrate_java_methods(&mut files, &["void b() {}\n".to_string()]);

        assert!(changed);
        assert_eq!(
            files[0].content,
            "public class BusinessServiceImpl {\n    void a() {}\n\nvoid b() {}\n\n\n}\n"
        );
    }

    #[test]
    fn test_integrate_without_target_is_noop() {
        let mut files = vec![GeneratedArtifact::new("pom.xml", "<project/>")];
        assert!(!integrate_java_methods(&mut files, &["void b() {}".to_string()]));
        assert!(!integrate_python_functions(&mut files, &["def f(): pass".to_string()]));
    }

    #[test]
    fn test_integrate_python_functions() {
        let mut files = vec![GeneratedArtifact::new("logic_module.py", "import data_access\n\n")];
        assert!(integrate_python_functions(
            &mut files,
            &["def run():\n    pass\n".to_string(), "def stop():\n    pass\n".to_string()]
        ));
        assert_eq!(
            files[0].content,
            "import data_access\n\ndef run():\n    pass\n\n\ndef stop():\n    pass\n"
        );
    }
}

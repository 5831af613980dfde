// In-memory stand-in for the GL driver so the shader builder can be tested
// without a context.

use crate::render::driver::ShaderDriver;
use crate::render::shaders::ShaderStage;
use gl::types::GLuint;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CStr;

struct FakeShader {
    stage: ShaderStage,
    compiled: bool,
    log: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<GLuint>,
    linked: bool,
    log: String,
}

#[derive(Default)]
struct State {
    next_id: GLuint,
    shaders: HashMap<GLuint, FakeShader>,
    programs: HashMap<GLuint, FakeProgram>,
    shaders_created: usize,
    shaders_deleted: usize,
    programs_created: usize,
    programs_deleted: usize,
    active_program: Option<GLuint>,
    refuse_allocations: bool,
}

impl State {
    fn allocate(&mut self) -> GLuint {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub(crate) struct FakeDriver {
    state: RefCell<State>,
}

impl FakeDriver {
    pub fn refuse_allocations(&self) {
        self.state.borrow_mut().refuse_allocations = true;
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn shaders_created(&self) -> usize {
        self.state.borrow().shaders_created
    }

    pub fn shaders_deleted(&self) -> usize {
        self.state.borrow().shaders_deleted
    }

    pub fn programs_created(&self) -> usize {
        self.state.borrow().programs_created
    }

    pub fn programs_deleted(&self) -> usize {
        self.state.borrow().programs_deleted
    }

    pub fn is_linked(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    pub fn attached_to(&self, program: GLuint) -> Vec<GLuint> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.attached.clone())
            .unwrap_or_default()
    }

    pub fn active_program(&self) -> Option<GLuint> {
        self.state.borrow().active_program
    }
}

/// Extracts `in`/`out` variable names, skipping `layout(...)` and
/// interpolation qualifiers.
fn interface_names(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.split("//").next().unwrap_or_default().trim();
            let line = match line.find(')') {
                Some(end) if line.starts_with("layout") => &line[end + 1..],
                _ => line,
            };
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let at = tokens.iter().position(|t| *t == qualifier)?;
            let name = tokens.get(at + 2)?;
            Some(name.trim_end_matches(';').to_owned())
        })
        .collect()
}

fn find_compiled<'a>(
    state: &'a State,
    attached: &[GLuint],
    stage: ShaderStage,
) -> Option<&'a FakeShader> {
    attached
        .iter()
        .filter_map(|id| state.shaders.get(id))
        .find(|s| s.stage == stage && s.compiled)
}

fn check_source(source: &str) -> Result<(), String> {
    let mut depth: i32 = 0;
    for (number, line) in source.lines().enumerate() {
        for c in line.chars() {
            match c {
                '{' | '(' => depth += 1,
                '}' | ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(format!("0:{}(1): error: unbalanced braces", number + 1));
            }
        }
    }
    if depth != 0 {
        return Err(format!(
            "0:{}(1): error: unbalanced braces at end of input",
            source.lines().count()
        ));
    }
    if !source.contains("void main") {
        return Err("0:1(1): error: no function with name 'main'".to_owned());
    }
    Ok(())
}

impl ShaderDriver for FakeDriver {
    fn create_shader(&self, stage: ShaderStage) -> Option<GLuint> {
        let mut state = self.state.borrow_mut();
        if state.refuse_allocations {
            return None;
        }
        let id = state.allocate();
        state.shaders_created += 1;
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                compiled: false,
                log: String::new(),
                inputs: Vec::new(),
                outputs: Vec::new(),
            },
        );
        Some(id)
    }

    fn compile_shader(&self, shader: GLuint, source: &CStr) {
        let source = source.to_string_lossy();
        let mut state = self.state.borrow_mut();
        let entry = state
            .shaders
            .get_mut(&shader)
            .unwrap_or_else(|| panic!("compile of unknown shader {shader}"));
        match check_source(&source) {
            Ok(()) => {
                entry.compiled = true;
                entry.log.clear();
                entry.inputs = interface_names(&source, "in");
                entry.outputs = interface_names(&source, "out");
            }
            Err(log) => {
                entry.compiled = false;
                entry.log = log;
            }
        }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.state.borrow().shaders[&shader].compiled
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        self.state.borrow().shaders[&shader].log.clone()
    }

    fn delete_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        if state.shaders.remove(&shader).is_none() {
            panic!("shader {shader} released twice");
        }
        state.shaders_deleted += 1;
    }

    fn create_program(&self) -> Option<GLuint> {
        let mut state = self.state.borrow_mut();
        if state.refuse_allocations {
            return None;
        }
        let id = state.allocate();
        state.programs_created += 1;
        state.programs.insert(id, FakeProgram::default());
        Some(id)
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(state.shaders.contains_key(&shader), "attach of released shader {shader}");
        let entry = state
            .programs
            .get_mut(&program)
            .unwrap_or_else(|| panic!("attach to unknown program {program}"));
        entry.attached.push(shader);
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        if let Some(entry) = state.programs.get_mut(&program) {
            entry.attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        let attached = state.programs[&program].attached.clone();
        let vertex = find_compiled(&state, &attached, ShaderStage::Vertex);
        let fragment = find_compiled(&state, &attached, ShaderStage::Fragment);

        let result = match (vertex, fragment) {
            (Some(vertex), Some(fragment)) => fragment
                .inputs
                .iter()
                .find(|input| !vertex.outputs.contains(input))
                .map_or(Ok(()), |missing| {
                    Err(format!(
                        "error: fragment shader input `{missing}` has no matching vertex shader output"
                    ))
                }),
            _ => Err("error: program needs a compiled vertex and fragment shader".to_owned()),
        };

        let entry = state
            .programs
            .get_mut(&program)
            .unwrap_or_else(|| panic!("link of unknown program {program}"));
        match result {
            Ok(()) => {
                entry.linked = true;
                entry.log.clear();
            }
            Err(log) => {
                entry.linked = false;
                entry.log = log;
            }
        }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        self.state.borrow().programs[&program].linked
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state.borrow().programs[&program].log.clone()
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        if state.programs.remove(&program).is_none() {
            panic!("program {program} released twice");
        }
        state.programs_deleted += 1;
        if state.active_program == Some(program) {
            state.active_program = None;
        }
    }

    fn use_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.programs.get(&program).map_or(false, |p| p.linked),
            "use of unlinked program {program}"
        );
        state.active_program = Some(program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_names_skip_layout_and_qualifiers() {
        let src = "layout (location = 0) in vec3 aPos;\nflat in uint BlockId;\nout vec4 FragColor;";
        assert_eq!(interface_names(src, "in"), vec!["aPos", "BlockId"]);
        assert_eq!(interface_names(src, "out"), vec!["FragColor"]);
    }
}

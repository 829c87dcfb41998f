//! Print script assembly.
//!
//! The script format is the comment-header G-code dialect consumed by
//! masked-LCD resin printers: a block of `;key:value` metadata lines, a
//! machine start block, one exposure block per layer, and a machine end
//! block. Layer blocks reference their exposure mask by the 1-based image
//! name the storage stage writes (`1.png`, `2.png`, ...).

use slice_profile::PrinterProfile;

/// Assembles a print script for one slicing run.
///
/// The assembler is parameterised by the printer profile and the total
/// layer count. Layer blocks are independent of raster results, so they
/// can be produced from any thread and concatenated in layer order
/// afterwards.
#[derive(Debug, Clone)]
pub struct ScriptAssembler<'a> {
    profile: &'a PrinterProfile,
    layer_count: u32,
}

impl<'a> ScriptAssembler<'a> {
    /// Create an assembler for `layer_count` layers.
    #[must_use]
    pub const fn new(profile: &'a PrinterProfile, layer_count: u32) -> Self {
        Self {
            profile,
            layer_count,
        }
    }

    /// The metadata header and machine start block.
    ///
    /// `file_name` names the sliced scene. The estimated print time sums
    /// bottom exposures, normal exposures and per-layer settle delays.
    #[must_use]
    pub fn header(&self, file_name: &str) -> String {
        let settings = &self.profile.print_settings;
        let estimated = settings.bottom_exposure_time * f64::from(settings.bottom_layers)
            + settings.exposure_time * f64::from(self.layer_count)
            + settings.delay_time * f64::from(self.layer_count);

        let mut script = format!(
            ";fileName:{file_name}\n\
             ;machineType:{machine}\n\
             ;estimatedPrintTime:{estimated}\n\
             ;volume:1\n\
             ;resin:normal\n\
             ;weight:1\n\
             ;price:1\n\
             ;layerHeight:{layer_height}\n\
             ;resolutionX:{res_x}\n\
             ;resolutionY:{res_y}\n\
             ;machineX:{size_x}\n\
             ;machineY:{size_y}\n\
             ;machineZ:{size_z}\n\
             ;projectType:LCD_mirror\n\
             ;normalExposureTime:{exposure}\n\
             ;bottomLayExposureTime:{bottom_exposure}\n\
             ;bottomLayerExposureTime:{bottom_exposure}\n\
             ;normalDropSpeed:{lift_speed}\n\
             ;normalLayerLiftHeight:{lift_height}\n\
             ;zSlowUpDistance:0\n\
             ;normalLayerLiftSpeed:{lift_speed}\n\
             ;bottomLayCount:{bottom_layers}\n\
             ;bottomLayerCount:{bottom_layers}\n\
             ;mirror:1\n\
             ;totalLayer:{layer_count}\n\
             ;bottomLayerLiftHeight:{lift_height}\n\
             ;bottomLayerLiftSpeed:{lift_speed}\n\
             ;bottomLightOffTime:0\n\
             ;lightOffTime:0",
            machine = self.profile.name,
            layer_height = settings.layer_height,
            res_x = self.profile.resolution.x,
            res_y = self.profile.resolution.y,
            size_x = self.profile.workspace.size_x,
            size_y = self.profile.workspace.size_y,
            size_z = self.profile.workspace.height,
            exposure = settings.exposure_time,
            bottom_exposure = settings.bottom_exposure_time,
            lift_speed = settings.lifting_speed,
            lift_height = settings.lifting_height,
            bottom_layers = settings.bottom_layers,
            layer_count = self.layer_count,
        );
        script.push_str("\n\n;START_GCODE_BEGIN\n");
        script.push_str(&self.profile.gcode.start);
        script.push_str("\n;START_GCODE_END");
        script
    }

    /// The exposure block for one 0-based layer index.
    ///
    /// The platform lifts to peel, settles back to the layer height, waits
    /// out the settle delay, then exposes. Layers up to and including the
    /// bottom layer count use the long bottom exposure.
    #[must_use]
    pub fn layer_block(&self, layer: u32) -> String {
        let settings = &self.profile.print_settings;
        let templates = &self.profile.gcode;
        // Layer heights travel in millimetres on the machine axis.
        let move_to = settings.layer_height * f64::from(layer);
        let lift_speed = format!("{}", settings.lifting_speed);
        let precision = self.profile.sharpness;

        let mut block = String::from("\n\n");
        block.push_str(&fill(
            &templates.show_image,
            "*x",
            &format!("{}", layer + 1),
        ));
        block.push('\n');

        let lifted = format!("{:.precision$}", move_to + settings.lifting_height);
        block.push_str(&fill(
            &fill(&templates.move_to, "*x", &lifted),
            "*y",
            &lift_speed,
        ));
        block.push('\n');

        let settled = format!("{move_to:.precision$}");
        block.push_str(&fill(
            &fill(&templates.move_to, "*x", &settled),
            "*y",
            &lift_speed,
        ));
        block.push('\n');

        block.push_str(&fill(
            &templates.delay,
            "*x",
            &format!("{}", settings.delay_time * 1000.0),
        ));
        block.push('\n');
        block.push_str(&templates.light_on);
        block.push('\n');

        let exposure = if settings.bottom_layers >= layer {
            settings.bottom_exposure_time
        } else {
            settings.exposure_time
        };
        block.push_str(&fill(&templates.delay, "*x", &format!("{}", exposure * 1000.0)));
        block.push('\n');
        block.push_str(&templates.light_off);
        block
    }

    /// The machine end block, parking the platform at the workspace top.
    #[must_use]
    pub fn footer(&self) -> String {
        let mut block = String::from("\n\n;END_GCODE_BEGIN\n");
        block.push_str(&fill(
            &self.profile.gcode.end,
            "*x",
            &format!("{}", self.profile.workspace.height),
        ));
        block.push_str("\n;END_GCODE_END");
        block
    }

    /// Concatenate header, layer fragments in order, and footer.
    #[must_use]
    pub fn assemble(&self, file_name: &str, fragments: &[String]) -> String {
        let mut script = self.header(file_name);
        for fragment in fragments {
            script.push_str(fragment);
        }
        script.push_str(&self.footer());
        script
    }

    /// Build the complete script in one pass.
    #[must_use]
    pub fn build(&self, file_name: &str) -> String {
        let fragments: Vec<String> = (0..self.layer_count)
            .map(|layer| self.layer_block(layer))
            .collect();
        self.assemble(file_name, &fragments)
    }
}

/// Replace the first occurrence of `token` only, so a value containing a
/// token never cascades into later substitutions.
fn fill(template: &str, token: &str, value: &str) -> String {
    template.replacen(token, value, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> PrinterProfile {
        PrinterProfile::default()
    }

    #[test]
    fn header_matches_the_metadata_layout() {
        let profile = profile();
        let assembler = ScriptAssembler::new(&profile, 100);
        let header = assembler.header("part");

        // 30 * 5 bottom + 2.5 * 100 normal + 0.5 * 100 delay.
        let expected = ";fileName:part\n\
                        ;machineType:Generic 4K Mono LCD\n\
                        ;estimatedPrintTime:450\n\
                        ;volume:1\n\
                        ;resin:normal\n\
                        ;weight:1\n\
                        ;price:1\n\
                        ;layerHeight:0.05\n\
                        ;resolutionX:3840\n\
                        ;resolutionY:2400\n\
                        ;machineX:192\n\
                        ;machineY:120\n\
                        ;machineZ:250\n\
                        ;projectType:LCD_mirror\n\
                        ;normalExposureTime:2.5\n\
                        ;bottomLayExposureTime:30\n\
                        ;bottomLayerExposureTime:30\n\
                        ;normalDropSpeed:65\n\
                        ;normalLayerLiftHeight:5\n\
                        ;zSlowUpDistance:0\n\
                        ;normalLayerLiftSpeed:65\n\
                        ;bottomLayCount:5\n\
                        ;bottomLayerCount:5\n\
                        ;mirror:1\n\
                        ;totalLayer:100\n\
                        ;bottomLayerLiftHeight:5\n\
                        ;bottomLayerLiftSpeed:65\n\
                        ;bottomLightOffTime:0\n\
                        ;lightOffTime:0\n\
                        \n\
                        ;START_GCODE_BEGIN\n\
                        G21\nG90\nM106 S0\nG28 Z0\n\
                        ;START_GCODE_END";
        assert_eq!(header, expected);
    }

    #[test]
    fn layer_block_formats_the_exposure_sequence() {
        let profile = profile();
        let assembler = ScriptAssembler::new(&profile, 100);

        // Layer 7 sits above the 5 bottom layers: Z = 0.35 mm, lift to
        // 5.35 mm, normal 2.5 s exposure.
        let block = assembler.layer_block(7);
        let expected = "\n\nM6054 \"8.png\"\n\
                        G0 Z5.35 F65\n\
                        G0 Z0.35 F65\n\
                        G4 P500\n\
                        M106 S255\n\
                        G4 P2500\n\
                        M106 S0";
        assert_eq!(block, expected);
    }

    #[test]
    fn bottom_layers_use_the_long_exposure() {
        let profile = profile();
        let assembler = ScriptAssembler::new(&profile, 100);

        // The bottom rule is inclusive of the boundary layer.
        assert!(assembler.layer_block(5).contains("G4 P30000"));
        assert!(assembler.layer_block(6).contains("G4 P2500"));
    }

    #[test]
    fn sharpness_controls_height_decimals() {
        let mut profile = profile();
        profile.sharpness = 3;
        let assembler = ScriptAssembler::new(&profile, 10);
        let block = assembler.layer_block(3);
        assert!(block.contains("G0 Z5.150 F65"));
        assert!(block.contains("G0 Z0.150 F65"));
    }

    #[test]
    fn only_the_first_token_occurrence_is_replaced() {
        let mut profile = profile();
        profile.gcode.move_to = "G0 Z*x F*y ;*x".to_string();
        let assembler = ScriptAssembler::new(&profile, 10);
        let block = assembler.layer_block(0);
        assert!(block.contains("G0 Z5.00 F65 ;*x"));
    }

    #[test]
    fn footer_parks_at_the_workspace_top() {
        let profile = profile();
        let assembler = ScriptAssembler::new(&profile, 10);
        assert_eq!(
            assembler.footer(),
            "\n\n;END_GCODE_BEGIN\nM106 S0\nG1 Z250 F25\nM18\n;END_GCODE_END"
        );
    }

    #[test]
    fn assemble_keeps_fragments_in_layer_order() {
        let profile = profile();
        let assembler = ScriptAssembler::new(&profile, 3);
        let script = assembler.build("ordered");

        assert!(script.starts_with(";fileName:ordered"));
        assert!(script.ends_with(";END_GCODE_END"));

        let first = script.find("M6054 \"1.png\"").unwrap();
        let second = script.find("M6054 \"2.png\"").unwrap();
        let third = script.find("M6054 \"3.png\"").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn zero_layers_build_to_header_and_footer() {
        let profile = profile();
        let assembler = ScriptAssembler::new(&profile, 0);
        let script = assembler.build("empty");
        assert_eq!(
            script,
            format!("{}{}", assembler.header("empty"), assembler.footer())
        );
    }
}

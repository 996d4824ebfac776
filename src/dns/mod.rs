use crate::color::ColorDelta;
use crate::config::DnsConfig;
use crate::error::ConfigResult;
use crate::exceptions::{AppContext, MapCategory, SpriteTagLookup};
use crate::filters::FilterPolicy;
use crate::lighting::apply_lighting;
use crate::palette::{PaletteBuffer, BANK_COUNT};
use crate::time::{resolve_progress, GameTime, TimePhase};


/// Everything the DNS reads from the rest of the game for one frame.
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    pub time: GameTime,
    pub app: AppContext,
    pub map: MapCategory,
    pub fade_active: bool,
    pub sprite_tags: &'a dyn SpriteTagLookup,
}

/// The filter chosen for a moment of the day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedFilter {
    pub phase: TimePhase,
    pub progress: u16,
    pub filter: ColorDelta,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Bit `n` set when bank `n` went through the filter.
    pub filtered_banks: u32,
    pub lit_cells: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Current map type is excluded; the output buffer was left alone.
    Bypassed,
    Built { resolved: ResolvedFilter, stats: FrameStats },
}

/// Day and night system: owns the filtered copy of palette RAM.
pub struct Dns {
    config: DnsConfig,
    output: PaletteBuffer,
}

impl Dns {
    pub fn new(config: DnsConfig) -> ConfigResult<Self> {
        config.validate()?;
        tracing::debug!(
            policy = ?config.policy,
            lighting_cells = config.lighting.cells.len(),
            tag_exceptions = config.exceptions.sprite_tags.len(),
            "DNS initialised"
        );
        Ok(Dns { config, output: PaletteBuffer::new() })
    }

    pub fn config(&self) -> &DnsConfig {
        &self.config
    }

    pub fn output(&self) -> &PaletteBuffer {
        &self.output
    }

    pub fn policy(&self) -> FilterPolicy {
        self.config.policy
    }

    pub fn set_policy(&mut self, policy: FilterPolicy) {
        if policy != self.config.policy {
            tracing::debug!(?policy, "filter policy changed");
            self.config.policy = policy;
        }
    }

    pub fn resolve_filter(&self, time: GameTime) -> ResolvedFilter {
        let phase = self.config.thresholds.resolve_phase(time.hour);
        let progress = resolve_progress(time.hour, time.minute);
        let filter = self.config.filters.select_filter(phase, progress);
        ResolvedFilter { phase, progress, filter }
    }

    pub fn is_map_exception(&self, map: MapCategory) -> bool {
        self.config.exceptions.is_map_exception(map)
    }

    fn lighting_active(&self, ctx: &FrameContext) -> bool {
        !ctx.app.is_combat() && self.config.lighting.window.contains(ctx.time.hour)
    }

    /// Rebuilds the output buffer from `source`. Call once per frame before
    /// the palette transfer.
    ///
    /// `unfaded` is the fade's baseline and is only written by the lighting
    /// overlay in [`LightingFadeMode::DeferToUnfaded`](crate::lighting::LightingFadeMode).
    pub fn build_frame(
        &mut self,
        ctx: &FrameContext,
        source: &PaletteBuffer,
        unfaded: &mut PaletteBuffer,
    ) -> FrameOutcome {
        if self.is_map_exception(ctx.map) {
            tracing::trace!(map = ?ctx.map, "map excluded from DNS");
            return FrameOutcome::Bypassed;
        }

        let resolved = self.resolve_filter(ctx.time);
        let policy = self.config.policy;
        let exceptions = &self.config.exceptions;
        let mut stats = FrameStats::default();

        for bank in 0..BANK_COUNT {
            let src = source.bank(bank);
            let dst = self.output.bank_mut(bank);
            if exceptions.should_filter(bank, ctx.app, ctx.map, ctx.sprite_tags) {
                policy.apply_bank(src, dst, resolved.filter);
                stats.filtered_banks |= 1 << bank;
            } else {
                dst.copy_from_slice(src);
            }
        }

        if self.lighting_active(ctx) {
            let lighting = &self.config.lighting;
            stats.lit_cells = apply_lighting(
                &lighting.cells,
                lighting.fade_mode,
                ctx.fade_active,
                source,
                unfaded,
                &mut self.output,
            );
        }

        tracing::trace!(
            phase = %resolved.phase,
            progress = resolved.progress,
            filter = resolved.filter.0,
            filtered_banks = stats.filtered_banks,
            lit_cells = stats.lit_cells,
            "frame built"
        );
        FrameOutcome::Built { resolved, stats }
    }

    /// Buffer the palette transfer should read this frame.
    pub fn select_transfer_source<'a>(
        &'a self,
        ctx: &FrameContext,
        source: &'a PaletteBuffer,
    ) -> &'a PaletteBuffer {
        let dns_context = matches!(ctx.app, AppContext::Overworld | AppContext::Combat);
        if dns_context && !self.is_map_exception(ctx.map) {
            &self.output
        } else {
            source
        }
    }

    /// Copies the selected buffer into `dest`, standing in for the palette DMA.
    pub fn transfer(&self, ctx: &FrameContext, source: &PaletteBuffer, dest: &mut PaletteBuffer) {
        dest.copy_from(self.select_transfer_source(ctx, source));
    }
}
